//! Entry point tying tabular addressing, generic resolution and activation
//! together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::activation::{activate, capture_failure_snapshot};
use crate::driver::PageDriver;
use crate::errors::{ClickTarget, LocatorError};
use crate::expander::IntentExpander;
use crate::resolver::{IntentResolver, SWEEP_INTERVAL};
use crate::synonyms::SynonymTable;
use crate::table::{parse_table_intent, RowLocator, RowMatch};
use crate::types::{
    Activation, ClickOptions, Resolution, TableIntent, ROW_ACTION_SELECTOR, ROW_SELECTOR,
};

/// Resolves free-form intents against a page and clicks the result.
///
/// Holds no per-call state, so one instance can serve any number of pages.
#[derive(Debug, Clone)]
pub struct SmartClicker {
    expander: IntentExpander,
    artifact_dir: Option<PathBuf>,
    sweep_interval: Duration,
}

impl Default for SmartClicker {
    fn default() -> Self {
        Self::new(Arc::new(SynonymTable::ui_defaults()))
    }
}

impl SmartClicker {
    pub fn new(table: Arc<SynonymTable>) -> Self {
        Self {
            expander: IntentExpander::new(table),
            artifact_dir: None,
            sweep_interval: SWEEP_INTERVAL,
        }
    }

    /// Write a page snapshot into `dir` whenever an intent finds no match
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn expander(&self) -> &IntentExpander {
        &self.expander
    }

    /// Locate the element for `intent` without clicking it.
    ///
    /// Ordinal intents go through the row locator first; an out-of-bounds row,
    /// or rows that cannot be listed, fall back to generic resolution of the
    /// whole text.
    ///
    /// The returned handle stays valid until the caller releases `driver`.
    pub async fn resolve(
        &self,
        driver: &dyn PageDriver,
        intent: &str,
        options: &ClickOptions,
    ) -> Result<(Resolution, Option<TableIntent>), LocatorError> {
        if let Some(table) = parse_table_intent(intent) {
            info!(row = table.row, action = %table.action, "looking for table row");
            let started = Instant::now();
            let located = self
                .locate_row(driver, table.row, &table.action, options.visible_only)
                .await;
            match located {
                Ok(found) => return Ok((row_resolution(found, started), Some(table))),
                Err(LocatorError::RowOutOfBounds { row, row_count }) => {
                    warn!(row, row_count, intent, "row out of bounds; trying generic resolution");
                }
                Err(LocatorError::Driver(err)) => {
                    warn!(intent, %err, "failed to list rows; trying generic resolution");
                }
                Err(err) => return Err(err),
            }
        }

        info!(intent, "searching for element");
        let resolution = IntentResolver::new(driver, &self.expander)
            .with_interval(self.sweep_interval)
            .resolve(intent, options)
            .await?;
        Ok((resolution, None))
    }

    /// Resolve `intent` and click the chosen element.
    ///
    /// Runs on its own fork of `driver` when the driver offers one and
    /// releases it before returning.
    pub async fn resolve_and_activate(
        &self,
        driver: &dyn PageDriver,
        intent: &str,
        options: &ClickOptions,
    ) -> Result<Activation, LocatorError> {
        let forked = driver.fork();
        let driver = forked.as_deref().unwrap_or(driver);
        let result = self.resolve_and_activate_inner(driver, intent, options).await;
        driver.release().await;
        result
    }

    async fn resolve_and_activate_inner(
        &self,
        driver: &dyn PageDriver,
        intent: &str,
        options: &ClickOptions,
    ) -> Result<Activation, LocatorError> {
        let (resolution, table) = match self.resolve(driver, intent, options).await {
            Ok(found) => found,
            Err(err) => {
                error!(intent, %err, "intent resolution failed");
                if matches!(err, LocatorError::NoMatch { .. }) {
                    self.capture_snapshot(driver, intent).await;
                }
                return Err(err);
            }
        };

        let target = match &table {
            Some(table) => ClickTarget::Row {
                intent: intent.to_string(),
                row: table.row,
                action: table.action.clone(),
            },
            None => ClickTarget::Intent(intent.to_string()),
        };

        if let Err(err) = activate(driver, &resolution.node, options.click_timeout(), &target).await
        {
            error!(%err, "activation failed");
            return Err(err);
        }

        info!(
            intent,
            score = %format!("{:.2}", resolution.score),
            text = %resolution.text,
            source = resolution.source,
            "clicked element"
        );
        Ok(Activation { resolution, table })
    }

    /// Click the `action` element of 1-based `row`, or the row itself when
    /// `action` is empty or nothing in the row matches it.
    pub async fn resolve_row(
        &self,
        driver: &dyn PageDriver,
        row: usize,
        action: Option<&str>,
        options: &ClickOptions,
    ) -> Result<Activation, LocatorError> {
        let action = action.unwrap_or_default().trim().to_string();
        let forked = driver.fork();
        let driver = forked.as_deref().unwrap_or(driver);
        let result = self.resolve_row_inner(driver, row, action, options).await;
        driver.release().await;
        result
    }

    async fn resolve_row_inner(
        &self,
        driver: &dyn PageDriver,
        row: usize,
        action: String,
        options: &ClickOptions,
    ) -> Result<Activation, LocatorError> {
        let intent = if action.is_empty() {
            row.to_string()
        } else {
            format!("{row} {action}")
        };
        let target = ClickTarget::Row {
            intent,
            row,
            action: action.clone(),
        };

        let started = Instant::now();
        let found = match self
            .locate_row(driver, row, &action, options.visible_only)
            .await
        {
            Ok(found) => found,
            Err(LocatorError::Driver(reason)) => {
                error!(row, %reason, "failed to list rows");
                return Err(LocatorError::RowLookupFailure { target, reason });
            }
            Err(err) => return Err(err),
        };
        let resolution = row_resolution(found, started);

        activate(driver, &resolution.node, options.click_timeout(), &target).await?;

        info!(row, action = %action, "clicked row");
        Ok(Activation {
            resolution,
            table: Some(TableIntent { row, action }),
        })
    }

    /// Row lookup without activation
    pub async fn locate_row(
        &self,
        driver: &dyn PageDriver,
        row: usize,
        action: &str,
        visible_only: bool,
    ) -> Result<RowMatch, LocatorError> {
        RowLocator::new(driver, &self.expander)
            .find_row(row, action, visible_only)
            .await
    }

    async fn capture_snapshot(&self, driver: &dyn PageDriver, intent: &str) {
        if let Some(dir) = &self.artifact_dir {
            if let Some(path) = capture_failure_snapshot(driver, dir, intent).await {
                info!(path = %path.display(), "saved failure snapshot");
            }
        }
    }
}

fn row_resolution(found: RowMatch, started: Instant) -> Resolution {
    Resolution {
        source: if found.is_row {
            ROW_SELECTOR
        } else {
            ROW_ACTION_SELECTOR
        },
        node: found.node,
        score: found.score,
        text: found.text,
        sweeps: 1,
        elapsed: started.elapsed(),
    }
}
