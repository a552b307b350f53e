//! Deterministic intent routing
//!
//! Classifies free-text support messages into a fixed intent taxonomy with a
//! prescribed action per intent. Rules are checked in insertion order and the
//! first match wins; the order encodes risk priority:
//! - injection refusal dominates every business rule,
//! - verified-source answers are unconditional (no tool, nothing to fail),
//! - clarification is preferred over invention whenever confidence is low.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tools::{ACCESS_CHECK, BILLING_LOOKUP};

/// Classified purpose of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    PromptInjection,
    PaidNoAccess,
    PaymentFailed,
    PaymentPending,
    BillingQuestion,
    ContactInfo,
    AccountHelp,
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::PromptInjection => "PROMPT_INJECTION",
            Intent::PaidNoAccess => "PAID_NO_ACCESS",
            Intent::PaymentFailed => "PAYMENT_FAILED",
            Intent::PaymentPending => "PAYMENT_PENDING",
            Intent::BillingQuestion => "BILLING_QUESTION",
            Intent::ContactInfo => "CONTACT_INFO",
            Intent::AccountHelp => "ACCOUNT_HELP",
            Intent::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Prescribed response strategy for an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    CallTool,
    UseVerifiedSource,
    Escalate,
    AskClarify,
    Refuse,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::CallTool => "CALL_TOOL",
            Action::UseVerifiedSource => "USE_VERIFIED_SOURCE",
            Action::Escalate => "ESCALATE",
            Action::AskClarify => "ASK_CLARIFY",
            Action::Refuse => "REFUSE",
        };
        write!(f, "{}", s)
    }
}

/// Routing decision for a single message
///
/// Produced fresh per classification; `tool_error` is only populated by the
/// orchestrator when a required tool call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub intent: Intent,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_error: Option<String>,
}

impl RouteOutcome {
    /// Create a new outcome with no tool error
    pub fn new(intent: Intent, action: Action) -> Self {
        Self {
            intent,
            action,
            tool_error: None,
        }
    }

    /// Attach a tool failure message
    pub fn with_tool_error(mut self, error: impl Into<String>) -> Self {
        self.tool_error = Some(error.into());
        self
    }
}

// Adversarial phrase markers, checked ahead of every business rule.
const INJECTION_MARKERS: &[&str] = &[
    // instruction override
    "ignore all",
    "ignore previous",
    "ignore policies",
    "disregard your",
    // fake system / developer-mode framing
    "system:",
    "developer mode",
    "you are now",
    // credential / data extraction
    "reveal credentials",
    "show me the password",
    "give me the gate code",
    "dump the database",
    "select * from",
    "drop table",
    // urgency pretext
    "bypass",
    "skip verification",
];

const PAID_MARKERS: &[&str] = &[
    "i paid",
    "paid ",
    "payment went through",
    "charged",
    "posted",
    "receipt",
];

const ACCESS_MARKERS: &[&str] = &[
    "access",
    "gate",
    "can't access",
    "cannot access",
    "locked out",
    "access denied",
    "unit",
];

const DECLINED_MARKERS: &[&str] = &[
    "declined",
    "failed",
    "error",
    "won't go through",
    "didn't go through",
];

const PENDING_MARKERS: &[&str] = &["pending", "processing", "not posted"];

const BILLING_MARKERS: &[&str] = &[
    "late fee",
    "charged twice",
    "refund",
    "credit",
    "invoice",
    "fee",
];

const CONTACT_MARKERS: &[&str] = &[
    "phone number",
    "office hours",
    "hours",
    "contact",
    "location",
    "address",
];

const ACCOUNT_MARKERS: &[&str] = &[
    "can't log in",
    "cannot log in",
    "log in",
    "login",
    "password",
    "reset",
    "update my card",
];

fn contains_any(message: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| message.contains(marker))
}

/// A single routing rule: predicate plus the outcome it prescribes
struct Rule {
    intent: Intent,
    action: Action,
    tool: Option<&'static str>,
    predicate: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

/// Ordered first-match-wins router
///
/// Deterministic: identical text always yields an identical outcome. No
/// clocks, randomness, or external state are consulted.
pub struct Router {
    rules: Vec<Rule>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule; insertion order is precedence order
    pub fn rule<F>(
        mut self,
        intent: Intent,
        action: Action,
        tool: Option<&'static str>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            intent,
            action,
            tool,
            predicate: Box::new(predicate),
        });
        self
    }

    /// Router with the support decision table
    pub fn support() -> Self {
        Self::new()
            // Safety first: refuse policy bypass attempts, even when the
            // message also carries business content.
            .rule(Intent::PromptInjection, Action::Refuse, None, |m| {
                contains_any(m, INJECTION_MARKERS)
            })
            // High-trust workflow: paid but no access goes to the lookup tool.
            .rule(
                Intent::PaidNoAccess,
                Action::CallTool,
                Some(ACCESS_CHECK),
                |m| {
                    contains_any(m, PAID_MARKERS)
                        && contains_any(m, ACCESS_MARKERS)
                        && !contains_any(m, DECLINED_MARKERS)
                },
            )
            // Declined or unclear charges are resolved by the user, not guessed.
            .rule(Intent::PaymentFailed, Action::AskClarify, None, |m| {
                contains_any(m, DECLINED_MARKERS)
                    && (m.contains("pay") || m.contains("card") || m.contains("charge"))
            })
            .rule(Intent::PaymentPending, Action::AskClarify, None, |m| {
                contains_any(m, PENDING_MARKERS)
                    && (m.contains("payment") || m.contains("paid") || m.contains("charge"))
            })
            // Billing questions need an account lookup.
            .rule(
                Intent::BillingQuestion,
                Action::CallTool,
                Some(BILLING_LOOKUP),
                |m| contains_any(m, BILLING_MARKERS),
            )
            // Never compose contact info; it must come from a verified source.
            .rule(Intent::ContactInfo, Action::UseVerifiedSource, None, |m| {
                contains_any(m, CONTACT_MARKERS)
            })
            // Identity cannot be verified by text pattern alone.
            .rule(Intent::AccountHelp, Action::Escalate, None, |m| {
                contains_any(m, ACCOUNT_MARKERS)
            })
    }

    /// Classify a message into an intent and its prescribed action
    ///
    /// Falls back to `UNKNOWN`/`ASK_CLARIFY` when no rule matches; an
    /// unmatched message is a valid outcome, not an error.
    pub fn classify(&self, message: &str) -> RouteOutcome {
        let normalized = message.to_lowercase();
        let normalized = normalized.trim();

        for rule in &self.rules {
            if (rule.predicate)(normalized) {
                tracing::debug!(
                    intent = %rule.intent,
                    action = %rule.action,
                    "matched routing rule"
                );
                return RouteOutcome::new(rule.intent, rule.action);
            }
        }

        tracing::debug!("no rule matched, asking for clarification");
        RouteOutcome::new(Intent::Unknown, Action::AskClarify)
    }

    /// Tool prescribed for an intent, if its rule routes through a tool
    pub fn tool_for(&self, intent: Intent) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.intent == intent)
            .and_then(|rule| rule.tool)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::support()
    }
}
