//! Evaluation harness
//!
//! Replays the golden set through the orchestrator one case at a time, in
//! the order supplied, compares produced intent/action against expectations,
//! aggregates per-category statistics, and applies the pass-rate gate. The
//! accumulating state is owned here and never exposed until the run
//! completes.

use chrono::Utc;
use uuid::Uuid;

use super::case::{Category, TestCase};
use super::report::{ActionCount, CategoryBreakdown, CategoryStats, FailureRecord, Report};
use crate::config::EvalConfig;
use crate::error::{KrisisError, Result};
use crate::orchestrator::Orchestrator;
use crate::routing::{Action, Router};
use crate::tools::ToolSimulator;

/// Drives golden-set evaluation runs
pub struct EvalHarness {
    orchestrator: Orchestrator,
    config: EvalConfig,
}

impl std::fmt::Debug for EvalHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalHarness")
            .field("config", &self.config)
            .finish()
    }
}

impl EvalHarness {
    /// Create a harness with the default (strict) configuration
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    /// Create a harness with a custom configuration
    pub fn with_config(config: EvalConfig) -> Self {
        let simulator = ToolSimulator::new().with_delay(config.simulated_delay);
        let orchestrator = Orchestrator::with_simulator(Router::support(), simulator);
        Self {
            orchestrator,
            config,
        }
    }

    /// Replace the orchestrator (custom router or tool backend)
    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    /// Run all cases and produce the report.
    ///
    /// A case passes iff both the produced intent and the produced action
    /// equal the expected ones; tool-error text is never compared, only
    /// retained in the failure record.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty golden set (a vacuous
    /// "100% of nothing" would invalidate the gate) or an invalid threshold.
    pub async fn run(&self, cases: &[TestCase]) -> Result<Report> {
        if cases.is_empty() {
            return Err(KrisisError::Configuration(
                "empty golden set: refusing to gate on zero cases".to_string(),
            ));
        }
        self.config.validate()?;

        let mut categories: Vec<CategoryBreakdown> = Vec::new();
        let mut actions: Vec<ActionCount> = Vec::new();
        let mut failures: Vec<FailureRecord> = Vec::new();
        let mut passed_count = 0usize;

        for case in cases {
            let scenario = case.tool_scenario.unwrap_or_default();
            let outcome = self
                .orchestrator
                .step(&case.input, case.tool_name.as_deref(), scenario)
                .await?;

            let ok = outcome.intent == case.expected_intent
                && outcome.action == case.expected_action;

            let stats = category_entry(&mut categories, case.category);
            stats.attempted += 1;
            action_entry(&mut actions, outcome.action).count += 1;

            if ok {
                passed_count += 1;
                stats.passed += 1;
                tracing::debug!(id = %case.id, intent = %outcome.intent, "case passed");
            } else {
                tracing::warn!(
                    id = %case.id,
                    expected_intent = %case.expected_intent,
                    expected_action = %case.expected_action,
                    actual_intent = %outcome.intent,
                    actual_action = %outcome.action,
                    "case failed"
                );
                failures.push(FailureRecord {
                    id: case.id.clone(),
                    category: case.category,
                    input: case.input.clone(),
                    expected_intent: case.expected_intent,
                    expected_action: case.expected_action,
                    actual_intent: outcome.intent,
                    actual_action: outcome.action,
                    tool_error: outcome.tool_error,
                });
            }
        }

        let total = cases.len();
        let score = passed_count as f64 / total as f64;
        let passed = score >= self.config.pass_threshold;

        tracing::info!(
            passed_count,
            total,
            score,
            gate = if passed { "pass" } else { "fail" },
            "evaluation run complete"
        );

        Ok(Report {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            score,
            passed,
            threshold: self.config.pass_threshold,
            total,
            passed_count,
            categories,
            actions,
            failures,
        })
    }
}

impl Default for EvalHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn category_entry(
    entries: &mut Vec<CategoryBreakdown>,
    category: Category,
) -> &mut CategoryStats {
    if let Some(index) = entries.iter().position(|e| e.category == category) {
        return &mut entries[index].stats;
    }
    entries.push(CategoryBreakdown {
        category,
        stats: CategoryStats::default(),
    });
    let index = entries.len() - 1;
    &mut entries[index].stats
}

fn action_entry(entries: &mut Vec<ActionCount>, action: Action) -> &mut ActionCount {
    if let Some(index) = entries.iter().position(|e| e.action == action) {
        return &mut entries[index];
    }
    entries.push(ActionCount { action, count: 0 });
    let index = entries.len() - 1;
    &mut entries[index]
}
