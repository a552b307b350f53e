//! Golden test case model and loading
//!
//! Test cases are immutable once loaded: read from the golden set, replayed,
//! and discarded after the run. A malformed record invalidates the meaning
//! of the gate, so loading fails fast instead of skipping or guessing.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{KrisisError, Result};
use crate::routing::{Action, Intent};
use crate::tools::ToolScenario;

/// Fixed category taxonomy for golden cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Payment,
    Billing,
    Contact,
    Account,
    Security,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Payment => "payment",
            Category::Billing => "billing",
            Category::Contact => "contact",
            Category::Account => "account",
            Category::Security => "security",
            Category::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// A single golden test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique, non-empty identifier
    pub id: String,

    /// Category used for report aggregation
    pub category: Category,

    /// Free-text user message to route
    pub input: String,

    /// Intent the router is expected to produce
    pub expected_intent: Intent,

    /// Action the router is expected to produce
    pub expected_action: Action,

    /// Tool to invoke when the routed action is CALL_TOOL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Simulation scenario for the tool call (defaults to `ok`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_scenario: Option<ToolScenario>,

    /// Free-text annotation, never interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TestCase {
    /// Create a new case with no tool inputs
    pub fn new(
        id: impl Into<String>,
        category: Category,
        input: impl Into<String>,
        expected_intent: Intent,
        expected_action: Action,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            input: input.into(),
            expected_intent,
            expected_action,
            tool_name: None,
            tool_scenario: None,
            notes: None,
        }
    }

    /// Set the tool name
    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// Set the tool scenario
    pub fn with_scenario(mut self, scenario: ToolScenario) -> Self {
        self.tool_scenario = Some(scenario);
        self
    }

    /// Attach a note
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validate structural invariants not expressible in the type
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(KrisisError::Configuration(
                "test case with empty id".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a JSONL golden set; blank lines are skipped
///
/// # Errors
///
/// Fails on the first malformed line, unknown enum value, empty id, or
/// duplicate id. All are configuration errors, fatal to the run.
pub fn parse_cases(content: &str) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();
    let mut seen = HashSet::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let case: TestCase = serde_json::from_str(line).map_err(|e| {
            KrisisError::Configuration(format!(
                "malformed test case at line {}: {}",
                index + 1,
                e
            ))
        })?;
        case.validate()?;

        if !seen.insert(case.id.clone()) {
            return Err(KrisisError::Configuration(format!(
                "duplicate test case id '{}'",
                case.id
            )));
        }
        cases.push(case);
    }

    Ok(cases)
}

/// Load the golden set from a JSONL file
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path)?;
    parse_cases(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let content = concat!(
            r#"{"id":"t1","category":"contact","input":"What are your hours?","expected_intent":"CONTACT_INFO","expected_action":"USE_VERIFIED_SOURCE"}"#,
            "\n\n",
            r#"{"id":"t2","category":"other","input":"hello","expected_intent":"UNKNOWN","expected_action":"ASK_CLARIFY"}"#,
            "\n",
        );

        let cases = parse_cases(content).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id, "t1");
        assert_eq!(cases[0].category, Category::Contact);
        assert_eq!(cases[1].expected_action, Action::AskClarify);
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = parse_cases("{not json}").unwrap_err();
        assert!(matches!(err, KrisisError::Configuration(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_rejects_unknown_scenario() {
        let content = r#"{"id":"t1","category":"payment","input":"I paid but no access","expected_intent":"PAID_NO_ACCESS","expected_action":"CALL_TOOL","tool_scenario":"flaky"}"#;

        let err = parse_cases(content).unwrap_err();
        assert!(matches!(err, KrisisError::Configuration(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let content = r#"{"id":"t1","category":"misc","input":"hello","expected_intent":"UNKNOWN","expected_action":"ASK_CLARIFY"}"#;

        assert!(parse_cases(content).is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let line = r#"{"id":"t1","category":"other","input":"hello","expected_intent":"UNKNOWN","expected_action":"ASK_CLARIFY"}"#;
        let content = format!("{}\n{}\n", line, line);

        let err = parse_cases(&content).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let case = TestCase::new(
            "  ",
            Category::Other,
            "hello",
            Intent::Unknown,
            Action::AskClarify,
        );
        assert!(case.validate().is_err());
    }

    #[test]
    fn test_case_round_trip() {
        let case = TestCase::new(
            "pay-01",
            Category::Payment,
            "I paid but still can't access my account",
            Intent::PaidNoAccess,
            Action::CallTool,
        )
        .with_tool("access-check")
        .with_scenario(ToolScenario::AuthError)
        .with_notes("failure injection");

        let json = serde_json::to_string(&case).unwrap();
        let parsed: TestCase = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, case.id);
        assert_eq!(parsed.tool_scenario, Some(ToolScenario::AuthError));
        assert_eq!(parsed.tool_name.as_deref(), Some("access-check"));
    }
}
