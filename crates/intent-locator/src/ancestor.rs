//! Clickable-ancestor resolution

use tracing::debug;

use crate::driver::{NodeHandle, PageDriver, PageScript};

/// Tags that are interactive by themselves
pub const CLICKABLE_TAGS: &[&str] = &["button", "a", "label"];

/// ARIA roles treated as interactive
pub const CLICKABLE_ROLES: &[&str] = &["button", "link"];

/// Inline handler attributes that make an element interactive
pub const HANDLER_ATTRIBUTES: &[&str] = &["onclick", "onmousedown", "onmouseup"];

/// `<input>` types that behave like buttons
pub const BUTTON_INPUT_TYPES: &[&str] = &["button", "submit", "reset"];

/// Lift `node` to itself or its nearest interactive ancestor.
///
/// Never fails: when the walk errors or finds nothing the original node is
/// returned.
pub async fn nearest_clickable(driver: &dyn PageDriver, node: &NodeHandle) -> NodeHandle {
    match driver
        .evaluate_handle(node, PageScript::NearestClickable)
        .await
    {
        Ok(clickable) => clickable,
        Err(err) => {
            debug!(node = %node, %err, "clickable ancestor walk failed; keeping node");
            node.clone()
        }
    }
}

/// Interactivity test used by drivers that walk the tree natively.
///
/// `attribute` looks up an attribute by name; `has_handler` reports a
/// scripted (non-attribute) click handler.
pub fn is_clickable<'a, F>(tag: &str, attribute: F, has_handler: bool) -> bool
where
    F: Fn(&str) -> Option<&'a str>,
{
    let tag = tag.to_ascii_lowercase();
    if CLICKABLE_TAGS.contains(&tag.as_str()) {
        return true;
    }
    if attribute("role").is_some_and(|role| CLICKABLE_ROLES.contains(&role)) {
        return true;
    }
    if HANDLER_ATTRIBUTES.iter().any(|name| attribute(name).is_some()) || has_handler {
        return true;
    }
    tag == "input"
        && attribute("type")
            .is_some_and(|kind| BUTTON_INPUT_TYPES.contains(&kind.to_ascii_lowercase().as_str()))
}
