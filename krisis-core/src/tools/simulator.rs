//! Deterministic tool simulation with injected failure scenarios
//!
//! Each scenario maps to exactly one outcome, so replaying a golden set is
//! reproducible: `ok` returns a synthetic payload keyed by tool name, the
//! three failure scenarios return one typed failure each. Scenario values
//! outside the fixed set cannot reach the simulator; they are rejected at
//! parse time as configuration errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use super::{ACCESS_CHECK, BILLING_LOOKUP, ToolBackend};
use crate::error::KrisisError;

/// Requested simulation scenario for a tool call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolScenario {
    /// Tool succeeds with a synthetic payload
    #[default]
    Ok,
    /// Tool fails after the configured simulated delay
    Timeout,
    /// Tool rejects the caller's credentials immediately
    AuthError,
    /// Tool reports a required payload field as absent
    MissingFields,
}

impl fmt::Display for ToolScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolScenario::Ok => "ok",
            ToolScenario::Timeout => "timeout",
            ToolScenario::AuthError => "auth_error",
            ToolScenario::MissingFields => "missing_fields",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ToolScenario {
    type Err = KrisisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(ToolScenario::Ok),
            "timeout" => Ok(ToolScenario::Timeout),
            "auth_error" => Ok(ToolScenario::AuthError),
            "missing_fields" => Ok(ToolScenario::MissingFields),
            other => Err(KrisisError::Configuration(format!(
                "unknown tool scenario '{}' (expected one of: ok, timeout, auth_error, missing_fields)",
                other
            ))),
        }
    }
}

/// Opaque success payload returned by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Field name to value mapping
    pub fields: Map<String, Value>,
}

impl ToolResponse {
    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn from_value(value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self { fields }
    }
}

/// Typed tool failure
///
/// A closed sum type rather than string codes, so the orchestrator's
/// handling is exhaustive and statically checkable. These are expected
/// outcomes, recoverable at the orchestrator layer; they never escape it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolFailure {
    /// Simulated timeout during tool execution
    #[error("tool '{tool}' timed out after {after_ms}ms")]
    Timeout { tool: String, after_ms: u64 },

    /// Simulated authentication/authorization failure
    #[error("tool '{tool}' authentication failed: invalid API key")]
    Auth { tool: String },

    /// Simulated missing or invalid data field
    #[error("tool '{tool}' missing required field: '{field}'")]
    MissingFields { tool: String, field: String },
}

/// Record of a single simulated call
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub tool: String,
    pub scenario: ToolScenario,
}

/// Deterministic tool simulator
///
/// The simulated delay only applies to the `timeout` scenario and is zero by
/// default, so a full golden-set run completes without real waits.
pub struct ToolSimulator {
    delay: Duration,
    call_count: AtomicUsize,
    calls: RwLock<Vec<CallRecord>>,
}

impl fmt::Debug for ToolSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSimulator")
            .field("delay", &self.delay)
            .field("call_count", &self.call_count.load(Ordering::SeqCst))
            .finish()
    }
}

impl ToolSimulator {
    /// Create a simulator with zero simulated delay
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            call_count: AtomicUsize::new(0),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Set the simulated delay for the `timeout` scenario
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of invocations since construction or the last reset
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// History of invocations (tool name and scenario per call)
    pub async fn calls(&self) -> Vec<CallRecord> {
        self.calls.read().await.clone()
    }

    /// Clear call count and history
    pub async fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.calls.write().await.clear();
    }

    /// Simulate a tool call with a deterministic outcome per scenario
    pub async fn invoke(
        &self,
        tool_name: &str,
        payload: &Value,
        scenario: ToolScenario,
    ) -> Result<ToolResponse, ToolFailure> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.write().await.push(CallRecord {
            tool: tool_name.to_string(),
            scenario,
        });

        match scenario {
            ToolScenario::Timeout => {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                Err(ToolFailure::Timeout {
                    tool: tool_name.to_string(),
                    after_ms: self.delay.as_millis() as u64,
                })
            }
            ToolScenario::AuthError => Err(ToolFailure::Auth {
                tool: tool_name.to_string(),
            }),
            ToolScenario::MissingFields => Err(ToolFailure::MissingFields {
                tool: tool_name.to_string(),
                field: missing_field(tool_name, payload).to_string(),
            }),
            ToolScenario::Ok => Ok(synthetic_payload(tool_name, payload)),
        }
    }
}

impl Default for ToolSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolBackend for ToolSimulator {
    async fn invoke(
        &self,
        tool_name: &str,
        payload: &Value,
        scenario: ToolScenario,
    ) -> Result<ToolResponse, ToolFailure> {
        ToolSimulator::invoke(self, tool_name, payload, scenario).await
    }
}

/// Required payload fields per tool
fn required_fields(tool_name: &str) -> &'static [&'static str] {
    match tool_name {
        ACCESS_CHECK => &["account_id", "unit"],
        BILLING_LOOKUP => &["account_id"],
        _ => &["account_id"],
    }
}

/// First required field absent from the payload, or the tool's primary
/// field when none is absent (the scenario forces a failure either way)
fn missing_field(tool_name: &str, payload: &Value) -> &'static str {
    let required = required_fields(tool_name);
    required
        .iter()
        .find(|field| payload.get(**field).is_none())
        .or_else(|| required.first())
        .copied()
        .unwrap_or("account_id")
}

/// Synthetic success payload keyed by tool name
fn synthetic_payload(tool_name: &str, payload: &Value) -> ToolResponse {
    let value = match tool_name {
        ACCESS_CHECK => json!({
            "status": "success",
            "payment_verified": true,
            "access_granted": true,
            "unit": payload.get("unit").and_then(Value::as_str).unwrap_or("unknown"),
            "last_payment_date": "2026-02-01",
            "message": "Payment verified, access should be enabled",
        }),
        BILLING_LOOKUP => json!({
            "status": "success",
            "account_id": payload
                .get("account_id")
                .and_then(Value::as_str)
                .unwrap_or("synthetic-001"),
            "balance": 0.0,
            "last_charge": {
                "amount": 150.0,
                "date": "2026-01-15",
                "description": "Monthly service fee",
            },
            "message": "Billing details retrieved",
        }),
        // Generic fallback for tools without a dedicated payload
        other => json!({
            "status": "success",
            "tool": other,
            "message": format!("Tool '{}' executed successfully (synthetic)", other),
        }),
    };

    ToolResponse::from_value(value)
}
