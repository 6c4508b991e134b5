//! Chromium DevTools Protocol driver for intent resolution.
//!
//! Connects to a running browser over its DevTools websocket, attaches to a
//! page target and implements [`intent_locator::PageDriver`] with raw
//! `Runtime`, `DOM`, `Input` and `Page` commands.

pub mod config;
pub mod error;
pub mod page;
pub mod transport;

pub use config::CdpConfig;
pub use error::{AdapterError, AdapterErrorKind};
pub use page::{CdpPage, OBJECT_GROUP};
pub use transport::{CdpTransport, ChromiumTransport, CommandTarget};
