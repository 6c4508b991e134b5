//! Error types for intent resolution

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`PageDriver`](crate::driver::PageDriver) implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DriverError {
    /// Handle no longer refers to a node attached to the document
    #[error("node detached: {0}")]
    Detached(String),

    /// Element is covered, zero-sized or otherwise refuses pointer input
    #[error("element not clickable: {0}")]
    NotClickable(String),

    /// Driver operation exceeded its own deadline
    #[error("driver timeout: {0}")]
    Timeout(String),

    /// Page-side script threw or returned an unexpected shape
    #[error("page script failed: {0}")]
    Script(String),

    /// Capability not offered by this driver
    #[error("unsupported driver capability: {0}")]
    Unsupported(&'static str),

    /// Transport or protocol failure talking to the browser
    #[error("transport error: {0}")]
    Transport(String),
}

impl DriverError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, DriverError::Timeout(_) | DriverError::Transport(_))
    }
}

/// What an activation was aimed at, used to attribute click failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// Free-form intent resolved by the generic resolver
    Intent(String),

    /// Tabular intent resolved by the row locator
    Row {
        intent: String,
        row: usize,
        action: String,
    },
}

impl ClickTarget {
    /// Original intent text the caller supplied
    pub fn intent(&self) -> &str {
        match self {
            ClickTarget::Intent(intent) => intent,
            ClickTarget::Row { intent, .. } => intent,
        }
    }
}

impl fmt::Display for ClickTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickTarget::Intent(intent) => write!(f, "element for intent \"{intent}\""),
            ClickTarget::Row {
                intent,
                row,
                action,
            } if action.is_empty() => write!(f, "row {row} for intent \"{intent}\""),
            ClickTarget::Row {
                intent,
                row,
                action,
            } => write!(f, "row {row} ({action}) for intent \"{intent}\""),
        }
    }
}

/// Terminal failures of a resolution call
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Row index outside `[1, row_count]`
    #[error("row {row} is out of bounds (1-{row_count})")]
    RowOutOfBounds { row: usize, row_count: usize },

    /// No candidate met the threshold within the time budget
    #[error("could not find element for intent: \"{intent}\" (best score {best_score:.2} after {elapsed:?})")]
    NoMatch {
        intent: String,
        best_score: f64,
        elapsed: Duration,
    },

    /// A candidate was chosen but the scroll or click could not be delivered
    #[error("found but could not click {target}: {reason}")]
    ActivationFailure {
        target: ClickTarget,
        reason: DriverError,
    },

    /// Rows could not be enumerated for a tabular target
    #[error("could not list rows for {target}: {reason}")]
    RowLookupFailure {
        target: ClickTarget,
        reason: DriverError,
    },

    /// Driver failure outside the per-candidate loop
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl LocatorError {
    /// True when an element was located but could not be activated
    pub fn is_activation_failure(&self) -> bool {
        matches!(self, LocatorError::ActivationFailure { .. })
    }

    /// Intent text carried by the error, when it has one
    pub fn intent(&self) -> Option<&str> {
        match self {
            LocatorError::NoMatch { intent, .. } => Some(intent),
            LocatorError::ActivationFailure { target, .. }
            | LocatorError::RowLookupFailure { target, .. } => Some(target.intent()),
            _ => None,
        }
    }
}
