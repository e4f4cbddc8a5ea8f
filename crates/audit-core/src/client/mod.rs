//! Gateway API Client
//!
//! Abstraction over the three admin-API endpoints the audit consumes.
//! Implement `GatewayClient` per transport; the reqwest implementation
//! talks to a live gateway, the mock replays scripted responses in tests.

mod http;
mod mock;

pub use http::{GatewayConfig, HttpGatewayClient};
pub use mock::MockGatewayClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Credential, ProbeOutcome, UserRecord};

/// Client for the gateway admin API
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Resolve the identity behind a credential
    ///
    /// `GET /admin/api/v1/users/current`. Non-200 is an authentication
    /// failure.
    async fn current_user(&self, credential: &Credential) -> Result<UserRecord>;

    /// Enumerate all user accounts (requires an administrative credential)
    ///
    /// `GET /admin/api/v1/users`. Non-200 is an authentication failure.
    async fn list_users(&self, credential: &Credential) -> Result<Vec<UserRecord>>;

    /// Attempt to create a payment session crediting another account
    ///
    /// `POST /admin/api/v1/payments?creditee_id=<id>`. Every status code
    /// maps to a [`ProbeOutcome`]; only transport failures are errors.
    async fn create_payment(
        &self,
        credential: &Credential,
        creditee_id: &str,
    ) -> Result<ProbeOutcome>;

    /// Client name (for logs)
    fn name(&self) -> &str;
}
