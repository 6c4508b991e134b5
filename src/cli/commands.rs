use clap::{Args, Subcommand};
use intent_locator::ClickOptions;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Resolve an intent on the current page and click it
    Click(ClickArgs),

    /// Click an action inside a table row, or the row itself
    Row(RowArgs),

    /// Show the search terms an intent expands to
    Expand(ExpandArgs),

    /// Show how an intent is parsed (tabular or free-form)
    Parse(ParseArgs),
}

/// Flags shared by the commands that talk to a browser
#[derive(Args, Clone, Debug, Default)]
pub struct BrowserArgs {
    /// DevTools websocket of the browser (overrides config and INTENTCLICK_WS_URL)
    #[arg(long, value_name = "URL")]
    pub ws_url: Option<String>,

    /// Also consider elements that are not visible
    #[arg(long)]
    pub include_hidden: bool,

    /// Per-click bound in milliseconds
    #[arg(long, value_name = "MS")]
    pub click_timeout_ms: Option<u64>,
}

#[derive(Args, Clone, Debug)]
pub struct ClickArgs {
    /// What to click, e.g. "submit", "⚙️" or "2nd edit"
    pub intent: String,

    /// Minimum score a candidate must reach (0.0-1.0)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Total search budget in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

#[derive(Args, Clone, Debug)]
pub struct RowArgs {
    /// 1-based row number
    pub row: usize,

    /// Action inside the row; the row itself is clicked when omitted
    pub action: Option<String>,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

#[derive(Args, Clone, Debug)]
pub struct ExpandArgs {
    pub keyword: String,
}

#[derive(Args, Clone, Debug)]
pub struct ParseArgs {
    pub intent: String,
}

impl ClickArgs {
    /// Configured defaults overridden by the flags given
    pub fn options(&self, base: &ClickOptions) -> ClickOptions {
        let mut options = self.browser.options(base);
        if let Some(threshold) = self.threshold {
            options = options.with_threshold(threshold);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options.timeout_ms = timeout_ms;
        }
        options
    }
}

impl BrowserArgs {
    pub fn options(&self, base: &ClickOptions) -> ClickOptions {
        let mut options = base.clone();
        if self.include_hidden {
            options.visible_only = false;
        }
        if let Some(ms) = self.click_timeout_ms {
            options.click_timeout_ms = ms;
        }
        options
    }
}
