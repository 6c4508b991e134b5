//! Synonym vocabulary
//!
//! A [`SynonymTable`] maps a canonical intent name to the interchangeable
//! words and glyphs a page might use for it. Groups keep their declaration
//! order: lookups scan them first to last and the first hit wins.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical intent with its synonyms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    pub canonical: String,
    pub terms: Vec<String>,
}

impl SynonymGroup {
    pub fn new<I, S>(canonical: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut group = Self {
            canonical: normalize(&canonical.into()),
            terms: Vec::new(),
        };
        group.push_terms(terms);
        group
    }

    fn push_terms<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for term in terms {
            let term = normalize(&term.into());
            if !term.is_empty() && !self.terms.contains(&term) {
                self.terms.push(term);
            }
        }
    }

    /// Whether `term` is one of the listed synonyms (canonical not implied)
    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }
}

/// Ordered, read-only vocabulary consulted by the intent expander.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
}

impl SynonymTable {
    /// Empty vocabulary; expansion then only ever yields the keyword
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: impl IntoIterator<Item = SynonymGroup>) -> Self {
        let mut table = Self::empty();
        table.extend(groups);
        table
    }

    /// Merge groups in: known canonicals gain the new terms, unknown ones are
    /// appended after the existing groups
    pub fn extend(&mut self, groups: impl IntoIterator<Item = SynonymGroup>) {
        for group in groups {
            match self
                .groups
                .iter_mut()
                .find(|existing| existing.canonical == group.canonical)
            {
                Some(existing) => existing.push_terms(group.terms),
                None => self.groups.push(group),
            }
        }
    }

    pub fn groups(&self) -> &[SynonymGroup] {
        &self.groups
    }

    pub fn get(&self, canonical: &str) -> Option<&SynonymGroup> {
        let canonical = normalize(canonical);
        self.groups.iter().find(|g| g.canonical == canonical)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Built-in UI vocabulary: navigation, common actions, files, media,
    /// social and directional intents
    pub fn ui_defaults() -> Self {
        Self::from_groups(DEFAULT_GROUPS.iter().map(|(canonical, terms)| {
            SynonymGroup::new(*canonical, terms.iter().copied())
        }))
    }
}

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    // Navigation
    ("back", &["back", "return", "←", "🔙", "previous", "◀️", "⬅️"]),
    ("next", &["next", "forward", "→", "➡️", "continue", "▶️", "⏭️"]),
    ("home", &["home", "house", "🏠", "main", "dashboard"]),
    ("close", &["close", "x", "×", "exit", "❌", "✖️", "cancel"]),
    // Common actions
    ("view", &["view", "eye", "👁️", "preview", "see", "show"]),
    ("edit", &["edit", "pencil", "✏️", "modify", "update", "change"]),
    ("delete", &["delete", "remove", "trash", "🗑️", "bin", "discard"]),
    ("submit", &["submit", "save", "confirm", "done", "✓", "✅", "✔️"]),
    ("cancel", &["cancel", "close", "stop", "✖️", "❌", "exit"]),
    // Files
    ("download", &["download", "⬇️", "save as", "export", "💾"]),
    ("upload", &["upload", "import", "attach", "📤", "cloud-upload"]),
    // Common UI elements
    ("menu", &["menu", "☰", "hamburger", "navigation", "≡"]),
    ("search", &["search", "🔍", "find", "lookup", "magnify"]),
    ("settings", &["settings", "⚙️", "gear", "preferences", "cog"]),
    ("profile", &["profile", "account", "user", "👤", "avatar"]),
    // Media
    ("play", &["play", "▶️", "start", "resume"]),
    ("pause", &["pause", "⏸️", "stop", "wait"]),
    ("volume", &["volume", "🔊", "sound", "🔈", "🔉", "🔇"]),
    // Generic intents
    ("add", &["add", "+", "new", "create", "➕", "insert"]),
    ("remove", &["remove", "−", "delete", "➖", "clear"]),
    ("refresh", &["refresh", "reload", "↻", "🔄", "update"]),
    // Social
    ("like", &["like", "❤️", "love", "favorite", "thumbs up", "👍"]),
    ("share", &["share", "send", "📤", "forward", "export"]),
    ("comment", &["comment", "💬", "reply", "chat", "message"]),
    // Directional
    ("up", &["up", "↑", "top", "north", "ascend"]),
    ("down", &["down", "↓", "bottom", "south", "descend"]),
    ("left", &["left", "←", "previous", "west", "back"]),
    ("right", &["right", "→", "next", "east", "forward"]),
];

impl Serialize for SynonymTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.canonical, &group.terms)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SynonymTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SynonymTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of canonical intent names to lists of synonyms")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = SynonymTable::empty();
                while let Some((canonical, terms)) = access.next_entry::<String, Vec<String>>()? {
                    table.extend([SynonymGroup::new(canonical, terms)]);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
