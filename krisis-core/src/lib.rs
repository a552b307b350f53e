//! # Krisis - Deterministic Triage for Support Agents
//!
//! Krisis (Κρίσις, "judgement") is a deterministic routing-and-evaluation
//! pipeline for support-agent behavior:
//! - **Routing**: ordered first-match-wins rules classify a free-text
//!   message into a fixed intent taxonomy, with a security-first precedence
//!   (injection refusal dominates all business rules)
//! - **Tool simulation**: deterministic synthetic payloads plus injected
//!   failure scenarios, typed as a closed sum
//! - **Orchestration**: every tool failure becomes a human escalation; no
//!   retries, no fallback to unverified data
//! - **Evaluation**: golden-set replay with per-category aggregation and a
//!   zero-tolerance pass-rate gate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use krisis_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let cases = load_cases("tests.jsonl")?;
//!     let report = EvalHarness::new().run(&cases).await?;
//!
//!     report.save("report.json")?;
//!     println!("{}", report.render_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Data flows one way: test case → router → (optional) tool simulator →
//! orchestrator outcome → harness comparison → report. Cases are processed
//! strictly one at a time; the only shared mutable state is the report
//! accumulator, owned by the harness and never exposed mid-run.

pub mod config;
pub mod error;
pub mod eval;
pub mod orchestrator;
pub mod routing;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::EvalConfig;
    pub use crate::error::{KrisisError, Result};
    pub use crate::eval::{
        Category, EvalHarness, FailureRecord, Report, TestCase, load_cases, parse_cases,
    };
    pub use crate::orchestrator::Orchestrator;
    pub use crate::routing::{Action, Intent, RouteOutcome, Router};
    pub use crate::tools::{
        ACCESS_CHECK, BILLING_LOOKUP, ToolBackend, ToolFailure, ToolResponse, ToolScenario,
        ToolSimulator,
    };
}
