//! Semantic element resolution
//!
//! Finds and clicks the element a free-form intent most likely refers to:
//! - Synonym and emoji expansion with fuzzy fallback
//! - Text facets gathered from content, naming attributes, classes and data-*
//! - Prioritised category sweep with bigram similarity scoring
//! - Ordinal row addressing ("2nd edit")
//! - Bounded re-sweeping while the page is still rendering

pub mod activation;
pub mod ancestor;
pub mod clicker;
pub mod driver;
pub mod errors;
pub mod expander;
pub mod extractor;
pub mod resolver;
pub mod scripts;
pub mod similarity;
pub mod synonyms;
pub mod table;
pub mod types;

pub use clicker::SmartClicker;
pub use driver::{NodeHandle, PageDriver, PageScript, QueryScope};
pub use errors::{ClickTarget, DriverError, LocatorError};
pub use expander::{ExpandedIntent, IntentExpander, IntentMatch};
pub use resolver::IntentResolver;
pub use synonyms::{SynonymGroup, SynonymTable};
pub use table::{parse_table_intent, RowLocator, RowMatch};
pub use types::*;
