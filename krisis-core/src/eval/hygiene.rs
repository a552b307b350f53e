//! Fixture hygiene checks
//!
//! The golden set is synthetic-only. These checks fail fast when a fixture
//! leaks a URL or an email-like string, or when a contact case expects
//! anything other than the verified-source action. Scenario validity needs
//! no check here: out-of-set values are already rejected at parse time.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use super::case::{Category, TestCase};
use crate::routing::Action;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^@\s"]+@[^@\s"]+\.[^@\s"]+"#).unwrap());

/// A single hygiene violation
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Id of the offending case
    pub case_id: String,

    /// What was found
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.case_id, self.message)
    }
}

/// Scan the golden set for hygiene violations
///
/// Returns every violation found; an empty result means the set is clean.
pub fn check_cases(cases: &[TestCase]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for case in cases {
        if case.category == Category::Contact && case.expected_action != Action::UseVerifiedSource
        {
            violations.push(Violation {
                case_id: case.id.clone(),
                message: format!(
                    "contact case but expected_action={} (must be USE_VERIFIED_SOURCE)",
                    case.expected_action
                ),
            });
        }

        // Scan the serialized form so every field is covered.
        let serialized = serde_json::to_string(case).unwrap_or_default();
        if URL_RE.is_match(&serialized) {
            violations.push(Violation {
                case_id: case.id.clone(),
                message: "contains URL".to_string(),
            });
        }
        if EMAIL_RE.is_match(&serialized) {
            violations.push(Violation {
                case_id: case.id.clone(),
                message: "contains email-like string".to_string(),
            });
        }
    }

    violations
}
