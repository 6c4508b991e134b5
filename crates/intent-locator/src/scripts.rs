//! Page-side function declarations.
//!
//! Each one is called with the target node bound to `this` and must not
//! mutate the document.

/// Text facets of an element, in collection order.
pub const EXTRACT_TEXTS_FN: &str = r#"
function() {
    const el = this;
    const texts = [];
    const text = (el.textContent || '').trim();
    if (text) { texts.push(text); }

    const attributes = [
        'title', 'aria-label', 'alt', 'placeholder', 'value', 'data-tooltip',
        'name', 'id', 'data-testid', 'data-test', 'data-qa', 'data-cy', 'data-icon'
    ];
    for (const attr of attributes) {
        const value = el.getAttribute(attr);
        if (value) { texts.push(value); }
    }

    const classes = (el.getAttribute('class') || '').split(/\s+/).filter(Boolean);
    texts.push(...classes);

    for (const attr of Array.from(el.attributes)) {
        if (attr.name.startsWith('data-')) { texts.push(attr.value); }
    }

    if (el.tagName.toLowerCase() === 'svg') {
        const label = el.getAttribute('aria-label');
        if (label) { texts.push(label); }
        const title = el.querySelector('title');
        if (title && title.textContent) { texts.push(title.textContent); }
    }

    return texts;
}
"#;

/// The node itself when interactive, else its nearest interactive ancestor,
/// else the node.
pub const NEAREST_CLICKABLE_FN: &str = r#"
function() {
    const isClickable = (el) => {
        const tag = el.tagName.toLowerCase();
        const role = el.getAttribute('role');
        const hasHandler = el.hasAttribute('onclick')
            || el.hasAttribute('onmousedown')
            || el.hasAttribute('onmouseup');
        const type = (el.getAttribute('type') || '').toLowerCase();
        return tag === 'button'
            || tag === 'a'
            || role === 'button'
            || role === 'link'
            || hasHandler
            || (tag === 'input' && ['button', 'submit', 'reset'].includes(type))
            || tag === 'label'
            || (el.onclick !== undefined && el.onclick !== null);
    };

    let current = this;
    while (current) {
        if (isClickable(current)) { return current; }
        current = current.parentElement;
    }
    return this;
}
"#;

/// Rendered with a non-empty box and not hidden by style.
pub const IS_VISIBLE_FN: &str = r#"
function() {
    if (!this.isConnected) { return false; }
    const style = window.getComputedStyle(this);
    if (style.visibility === 'hidden' || style.display === 'none') { return false; }
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}
"#;
