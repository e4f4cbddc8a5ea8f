//! Reqwest Gateway Client
//!
//! Talks to a live gateway. Requests are strictly sequential and no
//! explicit timeout is configured; a hang is acceptable for a manually
//! operated diagnostic and the operator can interrupt.

use async_trait::async_trait;
use reqwest::RequestBuilder;

use super::GatewayClient;
use crate::error::{AuditError, Result};
use crate::model::{Credential, ProbeOutcome, UserListBody, UserRecord};

/// Gateway connection configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL of the gateway, without a trailing slash
    pub base_url: String,

    /// Name of the session cookie the gateway issues at login
    pub session_cookie_name: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://app.doubleword.ai".into(),
            session_cookie_name: "dw_cookie".into(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("AUDIT_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "https://app.doubleword.ai".into());
        let session_cookie_name =
            std::env::var("AUDIT_COOKIE_NAME").unwrap_or_else(|_| "dw_cookie".into());

        Self {
            base_url,
            session_cookie_name,
        }
    }
}

/// Gateway client backed by reqwest
pub struct HttpGatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Decorate a request with the credential; never logged, never stored
    fn authorize(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        match credential {
            Credential::Bearer(token) => request.bearer_auth(token),
            Credential::SessionCookie(value) => request.header(
                reqwest::header::COOKIE,
                format!("{}={}", self.config.session_cookie_name, value),
            ),
        }
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn current_user(&self, credential: &Credential) -> Result<UserRecord> {
        let request = self.http.get(self.url("/admin/api/v1/users/current"));
        let response = self.authorize(request, credential).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let user: UserRecord = response.json().await?;
        Ok(user)
    }

    async fn list_users(&self, credential: &Credential) -> Result<Vec<UserRecord>> {
        let request = self.http.get(self.url("/admin/api/v1/users"));
        let response = self.authorize(request, credential).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let body: UserListBody = response.json().await?;
        Ok(body.into_users())
    }

    async fn create_payment(
        &self,
        credential: &Credential,
        creditee_id: &str,
    ) -> Result<ProbeOutcome> {
        let request = self
            .http
            .post(self.url("/admin/api/v1/payments"))
            .query(&[("creditee_id", creditee_id)]);
        let response = self.authorize(request, credential).send().await?;

        let status = response.status().as_u16();
        let raw = response.text().await.unwrap_or_default();

        Ok(classify_probe_response(status, raw))
    }

    fn name(&self) -> &str {
        "HttpGateway"
    }
}

/// Map the probe's HTTP status to the three-way outcome
///
/// 200 is a confirmed bypass, 403 a correct refusal, anything else is
/// surfaced as unexpected rather than swallowed.
pub(crate) fn classify_probe_response(status: u16, raw: String) -> ProbeOutcome {
    match status {
        200 => {
            let checkout_url = serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|v| v.get("url").and_then(|u| u.as_str()).map(String::from));
            ProbeOutcome::Created { checkout_url, raw }
        }
        403 => ProbeOutcome::Blocked { body: raw },
        other => ProbeOutcome::Unexpected {
            status: other,
            body: raw,
        },
    }
}
