//! # audit-core
//!
//! Core library for a manually operated authorization audit of a
//! model-gateway admin API: can a low-privilege (`StandardUser`) session
//! create a payment/credit-gifting checkout session on behalf of
//! another account?
//!
//! ## How the probe works
//!
//! The tool authenticates twice. An administrative bearer key resolves
//! the caller's identity and enumerates user accounts to pick a
//! low-privilege gift recipient. A session cookie — supplied
//! interactively by the operator, obtained from a browser login as a
//! `StandardUser` — then issues a single `POST /payments?creditee_id=…`
//! request. The response is a three-way classifier:
//!
//! - **200** → confirmed authorization bypass (checkout URL returned)
//! - **403** → correctly blocked, check passed
//! - anything else → unexpected, reported and never counted as a pass
//!
//! One attempt is definitive; there is no retry, no persistence, and no
//! concurrency. Credentials are request decorations only — never
//! stored, never parsed, redacted from `Debug` output.

pub mod client;
pub mod error;
pub mod model;
pub mod workflow;

pub use client::{GatewayClient, GatewayConfig, HttpGatewayClient, MockGatewayClient};
pub use error::{AuditError, Result};
pub use model::{Credential, ProbeOutcome, Role, UserRecord};
pub use workflow::{Operator, Verdict, run_audit};
