//! credit-audit
//!
//! Manual penetration-test probe: verifies whether a StandardUser
//! session can gift credits to another account through the gateway's
//! payments endpoint. Runs one linear workflow, reads one line of
//! operator input mid-run, and exits with a status code reflecting the
//! verdict.

mod operator;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audit_core::{GatewayConfig, HttpGatewayClient, run_audit};

use crate::operator::StdinOperator;

/// The gateway blocked the attempt
const EXIT_PASSED: i32 = 0;
/// Vulnerability confirmed, inconclusive probe, or setup failure
const EXIT_FAILED: i32 = 1;
/// Operator interrupted the run
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let code = tokio::select! {
        code = run() => code,
        _ = tokio::signal::ctrl_c() => {
            warn!("⚠ Audit interrupted by operator");
            EXIT_INTERRUPTED
        }
    };

    std::process::exit(code);
}

fn admin_key_from_env() -> anyhow::Result<String> {
    let key =
        std::env::var("AUDIT_ADMIN_API_KEY").context("AUDIT_ADMIN_API_KEY not set")?;
    anyhow::ensure!(!key.trim().is_empty(), "AUDIT_ADMIN_API_KEY is empty");
    Ok(key)
}

async fn run() -> i32 {
    let admin_api_key = match admin_key_from_env() {
        Ok(key) => key,
        Err(err) => {
            error!("❌ Setup failed: {:#}", err);
            return EXIT_FAILED;
        }
    };

    let config = GatewayConfig::from_env();
    info!("══════════════════════════════════════════════════");
    info!("🔍 AUTHORIZATION AUDIT: Can a StandardUser gift credits?");
    info!("🌐 Gateway: {}", config.base_url);
    info!("══════════════════════════════════════════════════");

    let client = HttpGatewayClient::new(config);
    let mut operator = StdinOperator::new();

    match run_audit(&client, &mut operator, &admin_api_key).await {
        Ok(verdict) if verdict.check_passed() => EXIT_PASSED,
        Ok(_) => EXIT_FAILED,
        Err(err) => {
            error!("❌ Audit failed: {:?}", err);
            error!("   {}", err.user_message());
            EXIT_FAILED
        }
    }
}
