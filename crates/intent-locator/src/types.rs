//! Core types for intent resolution

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::driver::NodeHandle;

/// Minimum acceptable score when none is configured
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Total search budget when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Per-click bound, independent of the search budget
pub const DEFAULT_CLICK_TIMEOUT_MS: u64 = 2_000;

/// Options recognised by a resolution call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickOptions {
    /// Minimum score a candidate must reach to be accepted (0.0-1.0)
    #[serde(deserialize_with = "clamped_threshold")]
    pub threshold: f64,

    /// Total search budget in milliseconds
    pub timeout_ms: u64,

    /// Skip candidates that fail the visibility check
    pub visible_only: bool,

    /// Bound applied separately to scroll and to click
    pub click_timeout_ms: u64,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            visible_only: true,
            click_timeout_ms: DEFAULT_CLICK_TIMEOUT_MS,
        }
    }
}

impl ClickOptions {
    /// Set the acceptance threshold, clamped into `[0, 1]`
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }

    /// Set the search budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Include or skip invisible candidates
    pub fn with_visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    /// Set the per-click bound
    pub fn with_click_timeout(mut self, timeout: Duration) -> Self {
        self.click_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn click_timeout(&self) -> Duration {
        Duration::from_millis(self.click_timeout_ms)
    }
}

fn clamp_threshold(threshold: f64) -> f64 {
    threshold.clamp(0.0, 1.0)
}

fn clamped_threshold<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_threshold)
}

/// Ordinal row addressing parsed from an intent such as `"3rd delete"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIntent {
    /// 1-based row number
    pub row: usize,

    /// In-row action keyword, possibly empty
    pub action: String,
}

/// Broad family a category selector belongs to, in sweep priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    Interactive,
    Icon,
    Attribute,
    Handler,
    Fallback,
}

impl CategoryKind {
    pub fn name(&self) -> &'static str {
        match self {
            CategoryKind::Interactive => "interactive",
            CategoryKind::Icon => "icon",
            CategoryKind::Attribute => "attribute",
            CategoryKind::Handler => "handler",
            CategoryKind::Fallback => "fallback",
        }
    }
}

/// One entry of the prioritised selector cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementCategory {
    pub selector: &'static str,
    pub kind: CategoryKind,
}

impl ElementCategory {
    const fn new(selector: &'static str, kind: CategoryKind) -> Self {
        Self { selector, kind }
    }

    /// Categories swept by the generic resolver, most specific first
    pub fn cascade() -> &'static [ElementCategory] {
        CASCADE
    }
}

const CASCADE: &[ElementCategory] = &[
    ElementCategory::new("button", CategoryKind::Interactive),
    ElementCategory::new("a", CategoryKind::Interactive),
    ElementCategory::new("[role=\"button\"]", CategoryKind::Interactive),
    ElementCategory::new("[role=\"link\"]", CategoryKind::Interactive),
    ElementCategory::new("input[type=\"button\"]", CategoryKind::Interactive),
    ElementCategory::new("input[type=\"submit\"]", CategoryKind::Interactive),
    ElementCategory::new("label", CategoryKind::Interactive),
    ElementCategory::new("svg", CategoryKind::Icon),
    ElementCategory::new("i", CategoryKind::Icon),
    ElementCategory::new("img", CategoryKind::Icon),
    ElementCategory::new("[aria-label]", CategoryKind::Attribute),
    ElementCategory::new("[title]", CategoryKind::Attribute),
    ElementCategory::new("[alt]", CategoryKind::Attribute),
    ElementCategory::new("[data-testid]", CategoryKind::Attribute),
    ElementCategory::new("[data-icon]", CategoryKind::Attribute),
    ElementCategory::new("[data-test]", CategoryKind::Attribute),
    ElementCategory::new("[data-qa]", CategoryKind::Attribute),
    ElementCategory::new("[data-cy]", CategoryKind::Attribute),
    ElementCategory::new("[onclick]", CategoryKind::Handler),
    ElementCategory::new("[onmousedown]", CategoryKind::Handler),
    ElementCategory::new("[onmouseup]", CategoryKind::Handler),
    ElementCategory::new("*", CategoryKind::Fallback),
];

/// Row-like elements for tabular addressing
pub const ROW_SELECTOR: &str = "tr, [role=\"row\"]";

/// Action-bearing descendants of a row
pub const ROW_ACTION_SELECTOR: &str =
    "button, a, [role=\"button\"], [onclick], [onmousedown], [onmouseup]";

/// Element considered during one sweep.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub node: NodeHandle,

    /// Space-joined, lowercased text facets
    pub text: String,

    /// Selector of the category the node was enumerated under
    pub source: &'static str,
}

/// Candidate with its best score over all expanded terms.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Element to activate (already lifted to its clickable ancestor)
    pub node: NodeHandle,

    pub score: f64,

    /// Aggregated text of the matched candidate
    pub text: String,

    /// Category selector, or the row selector for tabular matches
    pub source: &'static str,

    /// Completed sweeps, 1 for a first-pass match
    pub sweeps: u32,

    pub elapsed: Duration,
}

/// Report returned once an element has been clicked.
#[derive(Debug, Clone)]
pub struct Activation {
    pub resolution: Resolution,

    /// Present when the tabular path produced the element
    pub table: Option<TableIntent>,
}
