//! Simulated tool layer
//!
//! This module provides the integration seam the orchestrator calls and a
//! deterministic simulator behind it:
//! - Synthetic success payloads keyed by tool name
//! - Injected failure scenarios (timeout, auth, missing fields) as a closed
//!   sum type, so callers must handle each variant explicitly
//! - Call bookkeeping so tests can assert which paths never touch a tool
//!
//! No real network calls happen anywhere in this layer.

mod simulator;

pub use simulator::{
    CallRecord, ToolFailure, ToolResponse, ToolScenario, ToolSimulator,
};

use async_trait::async_trait;
use serde_json::Value;

/// Access verification tool for paid-but-locked-out reports
pub const ACCESS_CHECK: &str = "access-check";

/// Account billing lookup tool for charge and refund questions
pub const BILLING_LOOKUP: &str = "billing-lookup";

/// Integration seam for tool execution
///
/// The simulator is the only in-tree implementation; the trait is the
/// boundary a real integration layer would slot into.
#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Execute `tool_name` with `payload` under the given scenario
    async fn invoke(
        &self,
        tool_name: &str,
        payload: &Value,
        scenario: ToolScenario,
    ) -> Result<ToolResponse, ToolFailure>;
}
