//! Tabular addressing: "3rd delete", "2", "1st edit"

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::driver::{NodeHandle, PageDriver, QueryScope};
use crate::errors::LocatorError;
use crate::expander::IntentExpander;
use crate::extractor::aggregate_text;
use crate::similarity::best_term_score;
use crate::types::{TableIntent, ROW_ACTION_SELECTOR, ROW_SELECTOR};

/// Action assumed when an ordinal intent names none
pub const DEFAULT_ROW_ACTION: &str = "view";

static TABLE_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(\d+)(?i:st|nd|rd|th)?\s*(.*)$").expect("table intent pattern compiles")
});

/// Parse ordinal row addressing; `None` when the text has no leading integer
pub fn parse_table_intent(text: &str) -> Option<TableIntent> {
    let captures = TABLE_INTENT.captures(text)?;
    let row = captures.get(1)?.as_str().parse::<usize>().ok()?;
    let action = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|action| !action.is_empty())
        .unwrap_or(DEFAULT_ROW_ACTION);

    Some(TableIntent {
        row,
        action: action.to_string(),
    })
}

/// Element chosen inside a row.
#[derive(Debug, Clone)]
pub struct RowMatch {
    pub node: NodeHandle,

    /// 0.0 when the row itself was returned
    pub score: f64,

    /// Aggregated text of the chosen action element, empty for the row
    pub text: String,

    pub is_row: bool,
}

/// Locates rows by position and actions within them.
pub struct RowLocator<'a> {
    driver: &'a dyn PageDriver,
    expander: &'a IntentExpander,
}

impl<'a> RowLocator<'a> {
    pub fn new(driver: &'a dyn PageDriver, expander: &'a IntentExpander) -> Self {
        Self { driver, expander }
    }

    /// Find the best `action` element in 1-based row `row`, or the row itself
    pub async fn find_row(
        &self,
        row: usize,
        action: &str,
        visible_only: bool,
    ) -> Result<RowMatch, LocatorError> {
        let rows = self
            .driver
            .query_all(QueryScope::Document, ROW_SELECTOR)
            .await?;

        let Some(target) = row.checked_sub(1).and_then(|index| rows.get(index)) else {
            warn!(row, row_count = rows.len(), "row is out of bounds");
            return Err(LocatorError::RowOutOfBounds {
                row,
                row_count: rows.len(),
            });
        };

        let row_match = RowMatch {
            node: target.clone(),
            score: 0.0,
            text: String::new(),
            is_row: true,
        };

        if action.trim().is_empty() {
            return Ok(row_match);
        }

        let actions = match self
            .driver
            .query_all(QueryScope::Within(target), ROW_ACTION_SELECTOR)
            .await
        {
            Ok(actions) => actions,
            Err(err) => {
                warn!(row, %err, "failed to enumerate row actions; using row");
                return Ok(row_match);
            }
        };

        let terms = self.expander.expand(action);
        let mut best: Option<RowMatch> = None;
        let mut best_score = 0.0;

        for node in actions {
            if visible_only && !self.driver.is_visible(&node).await.unwrap_or(false) {
                continue;
            }

            let text = match aggregate_text(self.driver, &node).await {
                Ok(text) => text,
                Err(err) => {
                    debug!(node = %node, %err, "skipping row action");
                    continue;
                }
            };

            let score = best_term_score(&text, terms.iter());
            if score > best_score {
                best_score = score;
                best = Some(RowMatch {
                    node,
                    score,
                    text,
                    is_row: false,
                });
            }
        }

        match best {
            Some(found) => {
                info!(
                    row,
                    action,
                    score = found.score,
                    text = %found.text,
                    "matched row action"
                );
                Ok(found)
            }
            None => {
                debug!(row, action, "no row action matched; using row");
                Ok(row_match)
            }
        }
    }
}
