//! Page collaborator boundary
//!
//! The resolver never touches the document directly. Everything it needs from
//! the page goes through [`PageDriver`]: enumerate elements, ask whether they
//! are visible, run one of the fixed read-only [`PageScript`]s against a node,
//! and finally scroll and click. Scoring and control flow stay on this side of
//! the boundary.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DriverError;
use crate::scripts;

/// Opaque reference to a live DOM node, owned by the driver that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(String);

impl NodeHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Portion of the document a query inspects.
#[derive(Debug, Clone, Copy)]
pub enum QueryScope<'a> {
    /// Whole document
    Document,

    /// Descendants of the given node (the node itself excluded)
    Within(&'a NodeHandle),
}

/// Read-only functions evaluated against a node in the page context.
///
/// Drivers that can run JavaScript use [`PageScript::source`]; in-memory
/// drivers match on the variant and compute the same result natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScript {
    /// Returns an array of strings, see [`crate::extractor`]
    ExtractTexts,

    /// Returns a node: itself or its nearest interactive ancestor
    NearestClickable,

    /// Returns a boolean
    IsVisible,
}

impl PageScript {
    pub fn name(&self) -> &'static str {
        match self {
            PageScript::ExtractTexts => "extract-texts",
            PageScript::NearestClickable => "nearest-clickable",
            PageScript::IsVisible => "is-visible",
        }
    }

    /// Function declaration invoked with the node bound to `this`
    pub fn source(&self) -> &'static str {
        match self {
            PageScript::ExtractTexts => scripts::EXTRACT_TEXTS_FN,
            PageScript::NearestClickable => scripts::NEAREST_CLICKABLE_FN,
            PageScript::IsVisible => scripts::IS_VISIBLE_FN,
        }
    }
}

/// Browser or DOM automation collaborator consumed by the resolver.
///
/// Each call is an await point; the resolver issues them strictly one at a
/// time. Handles returned by one driver are only meaningful to that driver,
/// and those belonging to a sweep that found nothing are released before the
/// next sweep.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Elements matching `selector` within `scope`, in document order
    async fn query_all(
        &self,
        scope: QueryScope<'_>,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, DriverError>;

    /// Whether the node is rendered with a non-empty box
    async fn is_visible(&self, node: &NodeHandle) -> Result<bool, DriverError>;

    /// Run a value-returning script against the node
    async fn evaluate(&self, node: &NodeHandle, script: PageScript) -> Result<Value, DriverError>;

    /// Run a node-returning script against the node
    async fn evaluate_handle(
        &self,
        node: &NodeHandle,
        script: PageScript,
    ) -> Result<NodeHandle, DriverError>;

    /// Scroll the node into the viewport if needed
    async fn scroll_into_view(&self, node: &NodeHandle, timeout: Duration)
        -> Result<(), DriverError>;

    /// Deliver a primary-button click to the node
    async fn click(&self, node: &NodeHandle, timeout: Duration) -> Result<(), DriverError>;

    /// Capture a PNG of the current page for failure diagnostics
    async fn snapshot(&self) -> Result<Vec<u8>, DriverError> {
        Err(DriverError::Unsupported("snapshot"))
    }

    /// Release every handle issued since the last release
    async fn release(&self) {}

    /// View of this page whose handles form a group of their own, so that
    /// `release` on the view leaves handles held by other callers intact.
    ///
    /// `None` when the driver's handles need no releasing.
    fn fork(&self) -> Option<Box<dyn PageDriver + '_>> {
        None
    }
}
