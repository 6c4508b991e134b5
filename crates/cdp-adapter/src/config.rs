use serde::{Deserialize, Serialize};

/// Connection settings for an already running Chromium.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdpConfig {
    /// Browser-level DevTools endpoint, e.g. `ws://127.0.0.1:9222/devtools/browser/<id>`
    pub websocket_url: Option<String>,

    /// Upper bound for a single protocol round trip
    pub command_timeout_ms: u64,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            websocket_url: None,
            command_timeout_ms: 10_000,
        }
    }
}

impl CdpConfig {
    pub fn with_websocket_url(mut self, url: impl Into<String>) -> Self {
        self.websocket_url = Some(url.into());
        self
    }
}
