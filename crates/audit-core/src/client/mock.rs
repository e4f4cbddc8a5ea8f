//! Mock Gateway Client
//!
//! For testing and dry runs. Replays scripted identities, user lists,
//! and probe responses, and records every payment attempt so tests can
//! assert the probe fired (or didn't).

use std::sync::Mutex;

use async_trait::async_trait;

use super::GatewayClient;
use super::http::classify_probe_response;
use crate::error::{AuditError, Result};
use crate::model::{Credential, ProbeOutcome, UserRecord};

/// Gateway client with scripted responses
pub struct MockGatewayClient {
    admin_identity: Option<UserRecord>,
    session_identity: Option<UserRecord>,
    users: Vec<UserRecord>,
    probe_status: u16,
    probe_body: String,
    payment_attempts: Mutex<Vec<String>>,
}

impl Default for MockGatewayClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGatewayClient {
    pub fn new() -> Self {
        Self {
            admin_identity: None,
            session_identity: None,
            users: Vec::new(),
            probe_status: 403,
            probe_body: r#"{"error": "permission denied"}"#.into(),
            payment_attempts: Mutex::new(Vec::new()),
        }
    }

    /// Identity returned for bearer credentials
    pub fn with_admin_identity(mut self, user: UserRecord) -> Self {
        self.admin_identity = Some(user);
        self
    }

    /// Identity returned for session-cookie credentials
    pub fn with_session_identity(mut self, user: UserRecord) -> Self {
        self.session_identity = Some(user);
        self
    }

    pub fn with_users(mut self, users: Vec<UserRecord>) -> Self {
        self.users = users;
        self
    }

    /// Script the probe endpoint's response
    pub fn with_probe_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.probe_status = status;
        self.probe_body = body.into();
        self
    }

    /// Creditee ids of every payment attempt issued so far
    pub fn payment_attempts(&self) -> Vec<String> {
        self.payment_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayClient for MockGatewayClient {
    async fn current_user(&self, credential: &Credential) -> Result<UserRecord> {
        let identity = match credential {
            Credential::Bearer(_) => &self.admin_identity,
            Credential::SessionCookie(_) => &self.session_identity,
        };
        identity.clone().ok_or(AuditError::Auth {
            status: 401,
            body: "unauthorized".into(),
        })
    }

    async fn list_users(&self, _credential: &Credential) -> Result<Vec<UserRecord>> {
        Ok(self.users.clone())
    }

    async fn create_payment(
        &self,
        _credential: &Credential,
        creditee_id: &str,
    ) -> Result<ProbeOutcome> {
        self.payment_attempts
            .lock()
            .unwrap()
            .push(creditee_id.to_string());
        Ok(classify_probe_response(
            self.probe_status,
            self.probe_body.clone(),
        ))
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}
