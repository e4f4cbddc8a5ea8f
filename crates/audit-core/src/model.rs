//! Gateway Data Model
//!
//! Read-only views of the remote gateway's user records, the credentials
//! used to decorate requests, and the three-way probe classification.
//! Nothing here is mutated on the server and no identifiers are minted
//! locally.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform-wide roles as the gateway reports them
///
/// `Unknown` absorbs any role label added server-side after this tool
/// was written, so enumeration never fails on a new deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    PlatformManager,
    RequestViewer,
    StandardUser,
    BillingManager,
    #[serde(rename = "BatchAPIUser")]
    BatchApiUser,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Roles presumed authorized to create payments on behalf of others
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::PlatformManager | Role::BillingManager)
    }
}

/// A user record as returned by the gateway admin API
///
/// Unknown fields are ignored; `roles` and `is_admin` default to empty
/// and false so partial records still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Remote-issued identifier (opaque to this tool)
    pub id: String,

    pub email: String,

    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// True if this account holds any elevated privilege
    pub fn is_elevated(&self) -> bool {
        self.is_admin || self.roles.iter().any(Role::is_elevated)
    }
}

/// `StandardUser` role present and the admin flag unset
pub fn is_low_privilege(user: &UserRecord) -> bool {
    user.roles.contains(&Role::StandardUser) && !user.is_admin
}

/// Filter a user collection down to qualifying probe targets
///
/// Order is preserved; the workflow targets the first candidate.
pub fn low_privilege_candidates(users: &[UserRecord]) -> Vec<&UserRecord> {
    users.iter().filter(|u| is_low_privilege(u)).collect()
}

/// The user-listing endpoint returns either a paged envelope or a
/// flat array, depending on gateway version
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserListBody {
    Paged { data: Vec<UserRecord> },
    Flat(Vec<UserRecord>),
}

impl UserListBody {
    /// Extract the collection regardless of envelope shape
    pub fn into_users(self) -> Vec<UserRecord> {
        match self {
            UserListBody::Paged { data } => data,
            UserListBody::Flat(users) => users,
        }
    }
}

/// A credential used to decorate one request
///
/// Opaque strings, never persisted, never parsed. `Debug` redacts the
/// secret so credentials can't leak into logs.
#[derive(Clone)]
pub enum Credential {
    /// Long-lived administrative API key, sent as `Authorization: Bearer`
    Bearer(String),

    /// One user's live browser session, sent as a named cookie
    SessionCookie(String),
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Credential::Bearer(token.into())
    }

    pub fn session(cookie: impl Into<String>) -> Self {
        Credential::SessionCookie(cookie.into())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Credential::Bearer(<redacted>)"),
            Credential::SessionCookie(_) => f.write_str("Credential::SessionCookie(<redacted>)"),
        }
    }
}

/// Classification of the single payment probe attempt
///
/// One attempt is definitive for this test; this is a classifier, not a
/// retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP 200: the gateway created a checkout session for the session
    /// user — a confirmed authorization bypass
    Created {
        checkout_url: Option<String>,
        raw: String,
    },

    /// HTTP 403: the gateway correctly refused
    Blocked { body: String },

    /// Any other status: neither confirmed nor blocked
    Unexpected { status: u16, body: String },
}
