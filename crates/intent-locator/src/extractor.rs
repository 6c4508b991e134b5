//! Element text extraction
//!
//! Collects every textual facet of a node that can carry meaning: text
//! content, a fixed set of naming attributes, class tokens, `data-*` values
//! and, for SVG icons, their label and `<title>`.

use serde_json::Value;

use crate::driver::{NodeHandle, PageDriver, PageScript};
use crate::errors::DriverError;

/// Attributes read by name, in collection order
pub const TEXT_ATTRIBUTES: &[&str] = &[
    "title",
    "aria-label",
    "alt",
    "placeholder",
    "value",
    "data-tooltip",
    "name",
    "id",
    "data-testid",
    "data-test",
    "data-qa",
    "data-cy",
    "data-icon",
];

/// Text facets of `node`, possibly empty
pub async fn extract_texts(
    driver: &dyn PageDriver,
    node: &NodeHandle,
) -> Result<Vec<String>, DriverError> {
    let value = driver.evaluate(node, PageScript::ExtractTexts).await?;
    texts_from_value(value)
}

/// Single comparison string for `node`: facets joined by spaces, lowercased
pub async fn aggregate_text(
    driver: &dyn PageDriver,
    node: &NodeHandle,
) -> Result<String, DriverError> {
    Ok(aggregate(&extract_texts(driver, node).await?))
}

pub fn aggregate(texts: &[String]) -> String {
    texts.join(" ").to_lowercase()
}

fn texts_from_value(value: Value) -> Result<Vec<String>, DriverError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect()),
        other => Err(DriverError::Script(format!(
            "{} returned {other}, expected an array",
            PageScript::ExtractTexts.name()
        ))),
    }
}
