//! Commands that drive a live browser

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use cdp_adapter::{CdpPage, CdpTransport, ChromiumTransport};
use intent_locator::SmartClicker;
use tracing::info;

use super::commands::{ClickArgs, RowArgs};
use super::output::{print_activation, OutputFormat};
use crate::config::{Config, WS_URL_ENV};

pub async fn cmd_click(args: ClickArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let options = args.options(&config.click);
    let page = connect(config, args.browser.ws_url.as_deref()).await?;
    let clicker = clicker(config);

    let activation = clicker
        .resolve_and_activate(&page, &args.intent, &options)
        .await
        .with_context(|| format!("Failed to click \"{}\"", args.intent))?;

    print_activation(&activation, format)
}

pub async fn cmd_row(args: RowArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let options = args.browser.options(&config.click);
    let page = connect(config, args.browser.ws_url.as_deref()).await?;
    let clicker = clicker(config);

    let activation = clicker
        .resolve_row(&page, args.row, args.action.as_deref(), &options)
        .await
        .with_context(|| format!("Failed to click row {}", args.row))?;

    print_activation(&activation, format)
}

fn clicker(config: &Config) -> SmartClicker {
    let clicker = SmartClicker::new(Arc::new(config.synonym_table()));
    match &config.artifacts.dir {
        Some(dir) => clicker.with_artifact_dir(dir),
        None => clicker,
    }
}

async fn connect(config: &Config, ws_override: Option<&str>) -> Result<CdpPage> {
    let mut cdp = config.browser.clone();
    if let Some(url) = ws_override {
        cdp.websocket_url = Some(url.to_string());
    }
    let Some(url) = cdp.websocket_url.clone() else {
        bail!(
            "No browser websocket configured; pass --ws-url, set {WS_URL_ENV} \
             or browser.websocket_url in the config file"
        );
    };

    let transport = Arc::new(ChromiumTransport::new(cdp));
    transport
        .start()
        .await
        .with_context(|| format!("Failed to connect to browser at {url}"))?;

    let page = CdpPage::attach_first_page(transport)
        .await
        .context("Failed to attach to a page")?;
    info!(target_id = page.target_id(), "driving page");
    Ok(page)
}
