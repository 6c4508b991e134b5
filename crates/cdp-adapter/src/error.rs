use std::fmt;

use intent_locator::DriverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// High-level error categories surfaced by the adapter.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AdapterErrorKind {
    #[error("cdp command timed out")]
    CommandTimeout,
    #[error("cdp i/o failure")]
    CdpIo,
    #[error("page target not found")]
    TargetNotFound,
    #[error("remote object not found")]
    ObjectNotFound,
    #[error("page script failed")]
    ScriptFailed,
    #[error("element not clickable")]
    NotClickable,
    #[error("internal error")]
    Internal,
}

/// Enriched error metadata passed back to the resolver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub hint: Option<String>,
    pub retriable: bool,
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, ": {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind) -> Self {
        Self {
            kind,
            hint: None,
            retriable: false,
            data: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn retriable(mut self, flag: bool) -> Self {
        self.retriable = flag;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<AdapterError> for DriverError {
    fn from(err: AdapterError) -> Self {
        let message = err.to_string();
        match err.kind {
            AdapterErrorKind::CommandTimeout => DriverError::Timeout(message),
            AdapterErrorKind::ObjectNotFound => DriverError::Detached(message),
            AdapterErrorKind::NotClickable => DriverError::NotClickable(message),
            AdapterErrorKind::ScriptFailed => DriverError::Script(message),
            AdapterErrorKind::CdpIo
            | AdapterErrorKind::TargetNotFound
            | AdapterErrorKind::Internal => DriverError::Transport(message),
        }
    }
}
