//! Intent expansion
//!
//! Turns a raw keyword into the set of terms worth searching for: an exact
//! synonym hit pulls in its whole group, otherwise the closest group is used
//! when it is similar enough.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::similarity::dice_coefficient;
use crate::synonyms::{SynonymGroup, SynonymTable};

/// Similarity a fuzzy match must exceed to pull in a group
pub const FUZZY_FLOOR: f64 = 0.5;

/// How the keyword was linked to a synonym group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentMatch {
    Exact { canonical: String },
    Fuzzy { canonical: String, score: f64 },
}

impl IntentMatch {
    pub fn canonical(&self) -> &str {
        match self {
            IntentMatch::Exact { canonical } | IntentMatch::Fuzzy { canonical, .. } => canonical,
        }
    }
}

/// Lowercase search terms derived from one keyword, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedIntent {
    keyword: String,
    terms: Vec<String>,
    matched: Option<IntentMatch>,
}

impl ExpandedIntent {
    fn seed(keyword: String) -> Self {
        Self {
            terms: vec![keyword.clone()],
            keyword,
            matched: None,
        }
    }

    fn absorb(&mut self, group: &SynonymGroup) {
        for term in &group.terms {
            self.insert(term);
        }
        self.insert(&group.canonical);
    }

    fn insert(&mut self, term: &str) {
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
        }
    }

    /// Normalised keyword the expansion started from
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Always contains at least the keyword
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn matched(&self) -> Option<&IntentMatch> {
        self.matched.as_ref()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Expands keywords against an injected vocabulary.
#[derive(Debug, Clone)]
pub struct IntentExpander {
    table: Arc<SynonymTable>,
}

impl Default for IntentExpander {
    fn default() -> Self {
        Self::new(Arc::new(SynonymTable::ui_defaults()))
    }
}

impl IntentExpander {
    pub fn new(table: Arc<SynonymTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SynonymTable {
        &self.table
    }

    /// Expand `keyword`; never fails and never returns an empty set
    pub fn expand(&self, keyword: &str) -> ExpandedIntent {
        let lower = keyword.trim().to_lowercase();
        let mut expanded = ExpandedIntent::seed(lower.clone());

        if let Some(group) = self.table.groups().iter().find(|g| g.contains(&lower)) {
            expanded.absorb(group);
            expanded.matched = Some(IntentMatch::Exact {
                canonical: group.canonical.clone(),
            });
            return expanded;
        }

        let mut best: Option<(&SynonymGroup, f64)> = None;
        let mut best_score = FUZZY_FLOOR;
        for group in self.table.groups() {
            for term in &group.terms {
                let score = dice_coefficient(&lower, term);
                if score > best_score {
                    best_score = score;
                    best = Some((group, score));
                }
            }
        }

        if let Some((group, score)) = best {
            debug!(
                keyword = %lower,
                canonical = %group.canonical,
                score,
                "fuzzy matched intent"
            );
            expanded.absorb(group);
            expanded.matched = Some(IntentMatch::Fuzzy {
                canonical: group.canonical.clone(),
                score,
            });
        }

        expanded
    }
}
