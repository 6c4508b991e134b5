//! Generic intent resolution over the prioritised category cascade

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::ancestor::nearest_clickable;
use crate::driver::{PageDriver, QueryScope};
use crate::errors::LocatorError;
use crate::expander::{ExpandedIntent, IntentExpander};
use crate::extractor::aggregate_text;
use crate::similarity::best_term_score;
use crate::types::{Candidate, ClickOptions, ElementCategory, Resolution, ScoredCandidate};

/// Pause between sweeps that did not reach the threshold
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(100);

const PERFECT_SCORE: f64 = 1.0;

/// Best candidate of one sweep plus the highest score seen, even below
/// threshold.
#[derive(Debug, Default)]
struct SweepOutcome {
    best: Option<ScoredCandidate>,
    highest: f64,
}

/// Searches a page for the element an intent most likely names.
pub struct IntentResolver<'a> {
    driver: &'a dyn PageDriver,
    expander: &'a IntentExpander,
    interval: Duration,
}

impl<'a> IntentResolver<'a> {
    pub fn new(driver: &'a dyn PageDriver, expander: &'a IntentExpander) -> Self {
        Self {
            driver,
            expander,
            interval: SWEEP_INTERVAL,
        }
    }

    /// Override the pause between sweeps
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sweep repeatedly until a candidate meets `options.threshold` or the
    /// budget in `options.timeout_ms` runs out.
    ///
    /// At least one sweep always runs, even with a zero budget.
    pub async fn resolve(
        &self,
        intent: &str,
        options: &ClickOptions,
    ) -> Result<Resolution, LocatorError> {
        let terms = self.expander.expand(intent);
        let started = Instant::now();
        let deadline = started + options.timeout();
        let mut highest = 0.0_f64;
        let mut sweeps = 0u32;

        info!(
            intent,
            terms = terms.len(),
            threshold = options.threshold,
            timeout_ms = options.timeout_ms,
            "resolving intent"
        );

        loop {
            sweeps += 1;
            let cutoff = (sweeps > 1).then_some(deadline);
            let outcome = self.sweep(&terms, options, cutoff).await;
            highest = highest.max(outcome.highest);

            if let Some(found) = outcome.best {
                let elapsed = started.elapsed();
                info!(
                    intent,
                    score = found.score,
                    text = %found.candidate.text,
                    category = found.candidate.source,
                    sweeps,
                    "resolved intent"
                );
                return Ok(Resolution {
                    node: found.candidate.node,
                    score: found.score,
                    text: found.candidate.text,
                    source: found.candidate.source,
                    sweeps,
                    elapsed,
                });
            }

            self.driver.release().await;

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(self.interval.min(deadline - now)).await;
            if Instant::now() >= deadline {
                break;
            }
            debug!(intent, sweeps, highest, "retrying sweep");
        }

        let elapsed = started.elapsed();
        warn!(intent, highest, sweeps, ?elapsed, "no candidate met the threshold");
        Err(LocatorError::NoMatch {
            intent: intent.to_string(),
            best_score: highest,
            elapsed,
        })
    }

    /// One pass over every category. Stops early on a perfect score, or when
    /// `cutoff` passes between two categories.
    async fn sweep(
        &self,
        terms: &ExpandedIntent,
        options: &ClickOptions,
        cutoff: Option<Instant>,
    ) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();
        let mut best_score = 0.0_f64;

        for category in ElementCategory::cascade() {
            if cutoff.is_some_and(|cutoff| Instant::now() >= cutoff) {
                debug!(category = category.selector, "deadline passed mid-sweep");
                break;
            }

            let nodes = match self
                .driver
                .query_all(QueryScope::Document, category.selector)
                .await
            {
                Ok(nodes) => nodes,
                Err(err) => {
                    debug!(category = category.selector, %err, "category query failed");
                    continue;
                }
            };

            for node in nodes {
                if options.visible_only && !self.driver.is_visible(&node).await.unwrap_or(false) {
                    continue;
                }

                let text = match aggregate_text(self.driver, &node).await {
                    Ok(text) => text,
                    Err(err) => {
                        debug!(node = %node, %err, "skipping candidate");
                        continue;
                    }
                };
                if text.trim().is_empty() {
                    continue;
                }

                let score = best_term_score(&text, terms.iter());
                outcome.highest = outcome.highest.max(score);

                if score > best_score && score >= options.threshold {
                    best_score = score;
                    let node = nearest_clickable(self.driver, &node).await;
                    outcome.best = Some(ScoredCandidate {
                        candidate: Candidate {
                            node,
                            text,
                            source: category.selector,
                        },
                        score,
                    });

                    if score >= PERFECT_SCORE {
                        return outcome;
                    }
                }
            }
        }

        outcome
    }
}
