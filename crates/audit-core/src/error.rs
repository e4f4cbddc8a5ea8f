//! Error Types

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Audit error types
///
/// Every variant is terminal for the run: nothing is retried or
/// recovered automatically.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Identity or enumeration call rejected by the gateway
    #[error("Authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    /// No low-privilege account available to use as the probe target
    #[error("No low-privilege user found to target")]
    NoTarget,

    /// Operator supplied no session credential
    #[error("No session credential provided")]
    NoCredential,

    /// Operator declined to continue at a confirmation prompt
    #[error("Aborted by operator")]
    Aborted,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to the gateway
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not parse as expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic IO error (interactive input)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AuditError::Auth { status, .. } => {
                format!("The gateway rejected the credential (HTTP {}). Check the key or cookie value.", status)
            }
            AuditError::NoTarget => {
                "No StandardUser account found to use as the gift recipient.".into()
            }
            AuditError::NoCredential => {
                "A session cookie is required to run the probe. Copy the full cookie value.".into()
            }
            AuditError::Aborted => "Audit aborted before the probe was fired.".into(),
            AuditError::Config(msg) => format!("Configuration problem: {}", msg),
            AuditError::Network(_) => {
                "Could not reach the gateway. Check the base URL and your network.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}
