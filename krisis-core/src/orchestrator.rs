//! Step orchestration
//!
//! Composes the router's decision with the tool layer. A single fail-safe
//! rule governs every tool failure: the intent stands, the action becomes
//! `ESCALATE`, and the failure message rides along for diagnosis. No
//! retries, no silent fallback to unverified data.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{KrisisError, Result};
use crate::routing::{Action, RouteOutcome, Router};
use crate::tools::{ToolBackend, ToolScenario, ToolSimulator};

/// Orchestrates classification and the tool call it may require
pub struct Orchestrator {
    router: Router,
    backend: Arc<dyn ToolBackend>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("router", &self.router)
            .finish()
    }
}

impl Orchestrator {
    /// Create an orchestrator over an arbitrary tool backend
    pub fn new(router: Router, backend: Arc<dyn ToolBackend>) -> Self {
        Self { router, backend }
    }

    /// Create an orchestrator over the deterministic simulator
    pub fn with_simulator(router: Router, simulator: ToolSimulator) -> Self {
        Self::new(router, Arc::new(simulator))
    }

    /// The router driving classification
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Route a message and, when the action requires it, invoke the tool.
    ///
    /// Non-`CALL_TOOL` actions return the routed outcome unchanged: a
    /// supplied tool name or scenario is ignored, so callers cannot force
    /// an unintended tool call. For `CALL_TOOL`, a missing `tool_name`
    /// falls back to the tool the routing rule prescribes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error only if a `CALL_TOOL` intent has no
    /// prescribed tool and none was supplied; the current rule table always
    /// prescribes one.
    pub async fn step(
        &self,
        message: &str,
        tool_name: Option<&str>,
        scenario: ToolScenario,
    ) -> Result<RouteOutcome> {
        let outcome = self.router.classify(message);

        if outcome.action != Action::CallTool {
            return Ok(outcome);
        }

        let tool = match tool_name {
            Some(name) => name.to_string(),
            None => self
                .router
                .tool_for(outcome.intent)
                .ok_or_else(|| {
                    KrisisError::Configuration(format!(
                        "no tool prescribed for intent {}",
                        outcome.intent
                    ))
                })?
                .to_string(),
        };

        let payload = Value::Object(Map::new());
        match self.backend.invoke(&tool, &payload, scenario).await {
            Ok(_) => Ok(outcome),
            Err(failure) => {
                tracing::warn!(tool = %tool, error = %failure, "tool call failed, escalating");
                Ok(RouteOutcome::new(outcome.intent, Action::Escalate)
                    .with_tool_error(failure.to_string()))
            }
        }
    }
}
