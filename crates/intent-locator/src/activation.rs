//! Activation: scroll into view, click, and failure artifacts

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::driver::{NodeHandle, PageDriver};
use crate::errors::{ClickTarget, DriverError, LocatorError};

/// Scroll `node` into view and click it, each step bounded by
/// `click_timeout`. Failures are reported against `target` and never retried.
pub async fn activate(
    driver: &dyn PageDriver,
    node: &NodeHandle,
    click_timeout: Duration,
    target: &ClickTarget,
) -> Result<(), LocatorError> {
    let failure = |reason: DriverError| LocatorError::ActivationFailure {
        target: target.clone(),
        reason,
    };

    bounded(click_timeout, "scroll", driver.scroll_into_view(node, click_timeout))
        .await
        .map_err(failure)?;
    bounded(click_timeout, "click", driver.click(node, click_timeout))
        .await
        .map_err(failure)?;

    debug!(node = %node, %target, "activated element");
    Ok(())
}

async fn bounded<F>(limit: Duration, step: &str, operation: F) -> Result<(), DriverError>
where
    F: std::future::Future<Output = Result<(), DriverError>>,
{
    match timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::Timeout(format!(
            "{step} did not complete within {}ms",
            limit.as_millis()
        ))),
    }
}

/// File name used for the snapshot of a failed intent
pub fn snapshot_file_name(intent: &str) -> String {
    let slug = intent
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect::<String>();
    format!("error-{slug}.png")
}

/// Best-effort page snapshot into `dir`; returns the written path.
///
/// Every failure is logged and swallowed.
pub async fn capture_failure_snapshot(
    driver: &dyn PageDriver,
    dir: &Path,
    intent: &str,
) -> Option<PathBuf> {
    let bytes = match driver.snapshot().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(intent, %err, "failed to capture failure snapshot");
            return None;
        }
    };

    if let Err(err) = tokio::fs::create_dir_all(dir).await {
        warn!(dir = %dir.display(), %err, "failed to create snapshot directory");
        return None;
    }

    let path = dir.join(snapshot_file_name(intent));
    match tokio::fs::write(&path, bytes).await {
        Ok(()) => {
            debug!(path = %path.display(), "wrote failure snapshot");
            Some(path)
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to write failure snapshot");
            None
        }
    }
}
