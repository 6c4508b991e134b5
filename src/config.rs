//! Application configuration file

use std::env;
use std::path::PathBuf;

use cdp_adapter::CdpConfig;
use intent_locator::{ClickOptions, SynonymTable};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `browser.websocket_url`
pub const WS_URL_ENV: &str = "INTENTCLICK_WS_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// DevTools endpoint of the browser to drive
    pub browser: CdpConfig,

    /// Defaults for every click
    pub click: ClickOptions,

    pub synonyms: SynonymConfig,

    pub artifacts: ArtifactConfig,
}

/// How configured groups combine with the built-in vocabulary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynonymMode {
    #[default]
    Extend,
    Replace,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymConfig {
    pub mode: SynonymMode,

    /// canonical -> terms
    pub groups: SynonymTable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Failure snapshots are written here; unset disables capture
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Vocabulary resulting from the configured mode and groups
    pub fn synonym_table(&self) -> SynonymTable {
        match self.synonyms.mode {
            SynonymMode::Replace => self.synonyms.groups.clone(),
            SynonymMode::Extend => {
                let mut table = SynonymTable::ui_defaults();
                table.extend(self.synonyms.groups.groups().iter().cloned());
                table
            }
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_ws_url(env::var(WS_URL_ENV).ok());
    }

    fn apply_ws_url(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.browser.websocket_url = Some(url);
        }
    }
}
