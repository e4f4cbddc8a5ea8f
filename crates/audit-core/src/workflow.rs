//! Audit Workflow
//!
//! The four-stage probe sequence:
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ 1. Admin identity │──▶│ 2. Enumerate +   │──▶│ 3. Session cookie │
//! │    (bearer key)   │   │    pick target   │   │    (operator)     │
//! └──────────────────┘   └──────────────────┘   └────────┬─────────┘
//!                                                         │
//!                        ┌──────────────────┐   ┌────────▼─────────┐
//!                        │ 5. Verdict        │◀──│ 4. Fire the probe │
//!                        │    (pass / fail)  │   │    (one attempt)  │
//!                        └──────────────────┘   └──────────────────┘
//! ```
//!
//! Strictly sequential; the probe is attempted exactly once.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::client::GatewayClient;
use crate::error::{AuditError, Result};
use crate::model::{Credential, ProbeOutcome, UserRecord, low_privilege_candidates};

/// Human operator of the audit
///
/// The session cookie can only be obtained out-of-band (a browser login
/// as the low-privilege user), so the workflow stops mid-run and asks.
#[async_trait]
pub trait Operator: Send {
    /// Read one line of secret input; implementations should not echo it
    /// into logs
    async fn read_secret(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no confirmation, defaulting to no
    async fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Final classification of the audit run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The probe was refused with 403; the gateway enforces the
    /// permission correctly
    Blocked,

    /// The low-privilege session created a payment for another account
    Vulnerable {
        target_id: String,
        checkout_url: Option<String>,
        raw: String,
    },

    /// The probe returned a status outside {200, 403}; the result is
    /// inconclusive and must not be treated as a pass
    Unexpected { status: u16, body: String },
}

impl Verdict {
    /// True only when the gateway blocked the attempt
    pub fn check_passed(&self) -> bool {
        matches!(self, Verdict::Blocked)
    }
}

/// Run the full audit sequence against a gateway
///
/// Terminal on the first failure; nothing is retried.
pub async fn run_audit<C, O>(client: &C, operator: &mut O, admin_api_key: &str) -> Result<Verdict>
where
    C: GatewayClient + ?Sized,
    O: Operator + ?Sized,
{
    // Stage 1: confirm who the administrative key belongs to
    info!("══════════════════════════════════════════════════");
    info!("STEP 1: Resolve administrative identity");
    info!("══════════════════════════════════════════════════");

    let admin_credential = Credential::bearer(admin_api_key);
    let admin = client.current_user(&admin_credential).await?;
    log_identity(&admin);

    // Stage 2: enumerate users and pick the gift recipient
    info!("══════════════════════════════════════════════════");
    info!("STEP 2: Enumerate users and select a target");
    info!("══════════════════════════════════════════════════");

    let users = client.list_users(&admin_credential).await?;
    info!("✓ Found {} users", users.len());

    let candidates = low_privilege_candidates(&users);
    info!("  {} low-privilege candidates:", candidates.len());
    for candidate in candidates.iter().take(5) {
        info!("  • {} ({})", candidate.email, candidate.id);
    }

    let target = candidates.first().copied().ok_or(AuditError::NoTarget)?;
    let target = target.clone();
    info!(
        "✓ Will attempt to gift credits to: {} ({})",
        target.email, target.id
    );

    // Stage 3: session acquisition is manual and out-of-band
    info!("══════════════════════════════════════════════════");
    info!("STEP 3: Obtain a StandardUser session cookie");
    info!("══════════════════════════════════════════════════");
    info!("Manual step required:");
    info!("  1. Log in to the gateway in a browser as a StandardUser");
    info!("  2. DevTools (F12) → Application/Storage → Cookies");
    info!("  3. Copy the full value of the session cookie");

    let cookie = operator
        .read_secret("Paste the session cookie value: ")
        .await?;
    let cookie = cookie.trim().to_string();
    if cookie.is_empty() {
        return Err(AuditError::NoCredential);
    }
    let session_credential = Credential::session(cookie);

    // Verify the cookie works and its owner really is low-privilege
    let session_user = client.current_user(&session_credential).await?;
    log_identity(&session_user);

    if session_user.is_elevated() {
        warn!("⚠ This session has admin/manager privileges!");
        warn!("  Roles: {:?}", session_user.roles);
        warn!("  The test needs a StandardUser without elevated permissions");

        if !operator.confirm("Continue anyway? (y/N): ").await? {
            return Err(AuditError::Aborted);
        }
    }

    // Stage 4: one attempt, authenticated solely by the session cookie
    info!("══════════════════════════════════════════════════");
    info!("STEP 4: StandardUser attempts to gift credits");
    info!("══════════════════════════════════════════════════");
    info!("🎯 Session user: {}", session_user.email);
    info!("🎁 Gift recipient: {}", target.email);
    info!("   POST /admin/api/v1/payments?creditee_id={}", target.id);

    let outcome = client
        .create_payment(&session_credential, &target.id)
        .await?;

    Ok(report(outcome, &target))
}

fn log_identity(user: &UserRecord) {
    info!("✓ User ID: {}", user.id);
    info!("  Email: {}", user.email);
    info!("  Roles: {:?}", user.roles);
    info!("  Is Admin: {}", user.is_admin);
}

/// Turn the probe outcome into a verdict and report it
fn report(outcome: ProbeOutcome, target: &UserRecord) -> Verdict {
    info!("══════════════════════════════════════════════════");
    info!("RESULTS");
    info!("══════════════════════════════════════════════════");

    match outcome {
        ProbeOutcome::Created { checkout_url, raw } => {
            warn!("🚨 SECURITY VULNERABILITY CONFIRMED");
            warn!("   A StandardUser session created a payment for another account");
            warn!("   Expected: 403 Forbidden — Actual: 200 OK with checkout URL");

            if let Some(url) = &checkout_url {
                warn!("   Checkout URL: {}", url);
                if url.contains(&target.id) {
                    warn!("   ⚠ Checkout URL embeds the target user id: {}", target.id);
                    warn!("   Credits would go to the target, not the payer");
                }
            }

            warn!("🔧 Recommended fix: gate creditee_id behind a Credits::CreateAll");
            warn!("   permission check (BillingManager/PlatformManager only)");

            Verdict::Vulnerable {
                target_id: target.id.clone(),
                checkout_url,
                raw,
            }
        }
        ProbeOutcome::Blocked { body } => {
            info!("✅ SECURITY CHECK PASSED");
            info!("   StandardUser properly blocked from crediting other users");
            info!("   Response: {}", body);
            Verdict::Blocked
        }
        ProbeOutcome::Unexpected { status, body } => {
            warn!("⚠ Unexpected response from the payments endpoint: {}", status);
            warn!("  Body: {}", body);
            warn!("  Result is inconclusive; not treating this as a pass");
            Verdict::Unexpected { status, body }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockGatewayClient;
    use crate::model::Role;

    /// Operator that replays scripted answers
    struct ScriptedOperator {
        secret: String,
        confirm: bool,
        confirmations_asked: usize,
    }

    impl ScriptedOperator {
        fn new(secret: &str) -> Self {
            Self {
                secret: secret.into(),
                confirm: false,
                confirmations_asked: 0,
            }
        }

        fn confirming(mut self) -> Self {
            self.confirm = true;
            self
        }
    }

    #[async_trait]
    impl Operator for ScriptedOperator {
        async fn read_secret(&mut self, _prompt: &str) -> Result<String> {
            Ok(self.secret.clone())
        }

        async fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            self.confirmations_asked += 1;
            Ok(self.confirm)
        }
    }

    fn user(id: &str, roles: Vec<Role>, is_admin: bool) -> UserRecord {
        UserRecord {
            id: id.into(),
            email: format!("{}@example.com", id),
            roles,
            is_admin,
            created_at: None,
        }
    }

    fn platform_manager() -> UserRecord {
        user("pm", vec![Role::PlatformManager], true)
    }

    fn standard_user(id: &str) -> UserRecord {
        user(id, vec![Role::StandardUser], false)
    }

    /// Ten users, three matching the low-privilege predicate; the first
    /// match becomes the target and a 200 probe flags a bypass with the
    /// target id detected in the checkout URL.
    #[tokio::test]
    async fn test_end_to_end_bypass_confirmed() {
        let users = vec![
            platform_manager(),
            user("viewer", vec![Role::RequestViewer], false),
            standard_user("target-1"),
            user("billing", vec![Role::BillingManager], false),
            standard_user("target-2"),
            user("batch", vec![Role::BatchApiUser], false),
            user("admin2", vec![Role::StandardUser], true),
            standard_user("target-3"),
            user("viewer2", vec![Role::RequestViewer], false),
            user("pm2", vec![Role::PlatformManager], false),
        ];
        assert_eq!(users.len(), 10);
        assert_eq!(low_privilege_candidates(&users).len(), 3);

        let mock = MockGatewayClient::new()
            .with_admin_identity(platform_manager())
            .with_session_identity(standard_user("session"))
            .with_users(users)
            .with_probe_response(200, r#"{"url": "https://pay.example/checkout/target-1"}"#);
        let mut operator = ScriptedOperator::new("session-cookie-value");

        let verdict = run_audit(&mock, &mut operator, "admin-key").await.unwrap();

        match verdict {
            Verdict::Vulnerable {
                target_id,
                checkout_url,
                ..
            } => {
                assert_eq!(target_id, "target-1");
                let url = checkout_url.expect("checkout URL extracted");
                assert!(url.contains("target-1"));
            }
            other => panic!("expected Vulnerable, got {:?}", other),
        }
        assert!(!mock.payment_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_probe_passes_check() {
        let mock = MockGatewayClient::new()
            .with_admin_identity(platform_manager())
            .with_session_identity(standard_user("session"))
            .with_users(vec![standard_user("target-1")])
            .with_probe_response(403, r#"{"error": "permission denied"}"#);
        let mut operator = ScriptedOperator::new("cookie");

        let verdict = run_audit(&mock, &mut operator, "admin-key").await.unwrap();
        assert_eq!(verdict, Verdict::Blocked);
        assert!(verdict.check_passed());
    }

    #[tokio::test]
    async fn test_unexpected_status_is_not_a_pass() {
        let mock = MockGatewayClient::new()
            .with_admin_identity(platform_manager())
            .with_session_identity(standard_user("session"))
            .with_users(vec![standard_user("target-1")])
            .with_probe_response(501, r#"{"error": "no payment provider configured"}"#);
        let mut operator = ScriptedOperator::new("cookie");

        let verdict = run_audit(&mock, &mut operator, "admin-key").await.unwrap();
        match &verdict {
            Verdict::Unexpected { status, .. } => assert_eq!(*status, 501),
            other => panic!("expected Unexpected, got {:?}", other),
        }
        assert!(!verdict.check_passed());
    }

    #[tokio::test]
    async fn test_empty_cookie_terminates_before_probe() {
        let mock = MockGatewayClient::new()
            .with_admin_identity(platform_manager())
            .with_users(vec![standard_user("target-1")]);
        let mut operator = ScriptedOperator::new("   ");

        let err = run_audit(&mock, &mut operator, "admin-key")
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::NoCredential));
        assert!(mock.payment_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_no_target_found() {
        let mock = MockGatewayClient::new()
            .with_admin_identity(platform_manager())
            .with_users(vec![platform_manager()]);
        let mut operator = ScriptedOperator::new("cookie");

        let err = run_audit(&mock, &mut operator, "admin-key")
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::NoTarget));
        assert!(mock.payment_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_elevated_session_requires_confirmation() {
        let mock = MockGatewayClient::new()
            .with_admin_identity(platform_manager())
            .with_session_identity(user(
                "manager",
                vec![Role::StandardUser, Role::BillingManager],
                false,
            ))
            .with_users(vec![standard_user("target-1")]);

        // Declined: run aborts before the probe
        let mut declining = ScriptedOperator::new("cookie");
        let err = run_audit(&mock, &mut declining, "admin-key")
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Aborted));
        assert_eq!(declining.confirmations_asked, 1);
        assert!(mock.payment_attempts().is_empty());

        // Confirmed: the probe fires anyway
        let mut confirming = ScriptedOperator::new("cookie").confirming();
        let verdict = run_audit(&mock, &mut confirming, "admin-key")
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Blocked);
        assert_eq!(mock.payment_attempts(), vec!["target-1"]);
    }

    #[tokio::test]
    async fn test_bad_admin_key_fails_fast() {
        let mock = MockGatewayClient::new();
        let mut operator = ScriptedOperator::new("cookie");

        let err = run_audit(&mock, &mut operator, "bad-key")
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Auth { status: 401, .. }));
    }
}
