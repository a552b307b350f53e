//! Run reports
//!
//! The report is the sole surface for failure information: per-category
//! counters, an action distribution, and a failure record per mismatched
//! case with enough detail to diagnose without rerunning. Write-once per
//! invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use uuid::Uuid;

use super::case::Category;
use crate::error::Result;
use crate::routing::{Action, Intent};

/// Per-category counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub attempted: usize,
    pub passed: usize,
}

/// Category entry preserving first-occurrence order
///
/// Stable ordering keeps diffs between runs readable; the breakdown is
/// deliberately not sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    #[serde(flatten)]
    pub stats: CategoryStats,
}

/// Count of cases that produced a given action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCount {
    pub action: Action,
    pub count: usize,
}

/// Diagnosis record for a failed case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: String,
    pub category: Category,
    pub input: String,
    pub expected_intent: Intent,
    pub expected_action: Action,
    pub actual_intent: Intent,
    pub actual_action: Action,
    /// Tool failure message, retained for diagnosis but never compared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_error: Option<String>,
}

/// Write-once artifact for a single evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run identifier
    pub run_id: Uuid,

    /// Timestamp when the run completed
    pub generated_at: DateTime<Utc>,

    /// passed_count / total, in [0, 1]
    pub score: f64,

    /// Gate result: score >= threshold
    pub passed: bool,

    /// Threshold the gate was evaluated against
    pub threshold: f64,

    /// Number of cases attempted
    pub total: usize,

    /// Number of cases that passed
    pub passed_count: usize,

    /// Per-category breakdown in first-occurrence order
    pub categories: Vec<CategoryBreakdown>,

    /// Distribution of produced actions in first-occurrence order
    pub actions: Vec<ActionCount>,

    /// One record per failed case, in run order
    pub failures: Vec<FailureRecord>,
}

impl Report {
    /// Save the report as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a report from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Human-readable summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "=== Summary ===");
        let _ = writeln!(
            out,
            "Score: {}/{} ({:.1}%)",
            self.passed_count,
            self.total,
            self.score * 100.0
        );
        let _ = writeln!(
            out,
            "Gate: {} (threshold {:.1}%)",
            if self.passed { "PASS" } else { "FAIL" },
            self.threshold * 100.0
        );

        let _ = writeln!(out, "\n=== By category ===");
        for entry in &self.categories {
            let _ = writeln!(
                out,
                "- {}: {} pass / {} fail",
                entry.category,
                entry.stats.passed,
                entry.stats.attempted - entry.stats.passed
            );
        }

        let _ = writeln!(out, "\n=== Action distribution ===");
        for entry in &self.actions {
            let _ = writeln!(out, "- {}: {}", entry.action, entry.count);
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out, "\n=== Failures ===");
            for failure in &self.failures {
                let _ = writeln!(
                    out,
                    "- {} [{}]: expected ({}, {}) got ({}, {})",
                    failure.id,
                    failure.category,
                    failure.expected_intent,
                    failure.expected_action,
                    failure.actual_intent,
                    failure.actual_action
                );
                if let Some(ref error) = failure.tool_error {
                    let _ = writeln!(out, "    tool error: {}", error);
                }
            }
        }

        out
    }
}
