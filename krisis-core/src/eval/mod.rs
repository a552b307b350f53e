//! Golden-set evaluation
//!
//! This module provides the regression oracle for the routing pipeline:
//! - Load golden test cases from a JSONL file
//! - Replay each case through the orchestrator with its failure scenario
//! - Compare produced intent/action against expectations
//! - Aggregate per-category statistics and apply the pass-rate gate
//! - Emit a write-once report artifact
//!
//! # Example
//!
//! ```rust,no_run
//! use krisis_core::eval::{EvalHarness, load_cases};
//!
//! # async fn run() -> krisis_core::error::Result<()> {
//! let cases = load_cases("tests.jsonl")?;
//! let report = EvalHarness::new().run(&cases).await?;
//! assert!(report.passed);
//! # Ok(())
//! # }
//! ```

mod case;
mod harness;
mod report;

pub mod hygiene;

pub use case::{Category, TestCase, load_cases, parse_cases};
pub use harness::EvalHarness;
pub use report::{ActionCount, CategoryBreakdown, CategoryStats, FailureRecord, Report};

#[cfg(test)]
mod tests;
