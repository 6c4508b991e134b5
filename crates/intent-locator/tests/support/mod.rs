//! In-memory page used by the integration suites.
//!
//! Elements are declared with [`el`] and mounted under a `<body>`. Scripts
//! are answered natively so the resolver sees the same values a browser
//! would return.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use intent_locator::ancestor::is_clickable;
use intent_locator::extractor::TEXT_ATTRIBUTES;
use intent_locator::{DriverError, NodeHandle, PageDriver, PageScript, QueryScope};
use serde_json::{json, Value};
use tokio::time::Instant;

/// Element declaration
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<El>,
    hidden: bool,
    handler: bool,
    broken: bool,
    appears_after: Option<Duration>,
    key: Option<String>,
}

pub fn el(tag: &str) -> El {
    El {
        tag: tag.to_ascii_lowercase(),
        ..El::default()
    }
}

impl El {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }

    /// Rendered without a box; descendants are hidden too
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Scripted click handler with no inline attribute
    pub fn handler(mut self) -> Self {
        self.handler = true;
        self
    }

    /// Text extraction throws for this element
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// Inserted into the document `delay` after the page is created
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    /// Test-side name used to look the handle up; not visible to the page
    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }
}

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<usize>,
    parent: Option<usize>,
    hidden: bool,
    handler: bool,
    broken: bool,
    appears_at: Option<Instant>,
}

impl Node {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Fake page implementing [`PageDriver`] over a static tree.
pub struct FakePage {
    nodes: Vec<Node>,
    keys: HashMap<String, usize>,
    click_error: Option<DriverError>,
    click_delay: Option<Duration>,
    snapshot: Option<Vec<u8>>,
    query_errors: Vec<(String, DriverError)>,
    query_delay: Option<Duration>,
    grouped: bool,
    queries: Mutex<usize>,
    clicks: Mutex<Vec<NodeHandle>>,
    scrolls: Mutex<Vec<NodeHandle>>,
    releases: Mutex<usize>,
    group_releases: Mutex<usize>,
}

impl FakePage {
    /// Mount `elements` under a `<body>` node
    pub fn new(elements: impl IntoIterator<Item = El>) -> Self {
        let created = Instant::now();
        let mut page = Self {
            nodes: Vec::new(),
            keys: HashMap::new(),
            click_error: None,
            click_delay: None,
            snapshot: None,
            query_errors: Vec::new(),
            query_delay: None,
            grouped: false,
            queries: Mutex::new(0),
            clicks: Mutex::new(Vec::new()),
            scrolls: Mutex::new(Vec::new()),
            releases: Mutex::new(0),
            group_releases: Mutex::new(0),
        };
        let body = el("body").children(elements).key("body");
        page.mount(body, None, created);
        page
    }

    pub fn failing_clicks(mut self, error: DriverError) -> Self {
        self.click_error = Some(error);
        self
    }

    /// Every click takes `delay` before completing
    pub fn slow_clicks(mut self, delay: Duration) -> Self {
        self.click_delay = Some(delay);
        self
    }

    /// Queries for exactly `selector` fail with `error`
    pub fn failing_query(mut self, selector: &str, error: DriverError) -> Self {
        self.query_errors.push((selector.to_string(), error));
        self
    }

    /// Every `query_all` takes `delay` before answering
    pub fn slow_queries(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    /// Offer forked views whose releases are counted apart from the page's
    pub fn grouped(mut self) -> Self {
        self.grouped = true;
        self
    }

    pub fn with_snapshot(mut self, bytes: &[u8]) -> Self {
        self.snapshot = Some(bytes.to_vec());
        self
    }

    /// Handle of the element declared with `key`
    pub fn node(&self, key: &str) -> NodeHandle {
        let index = self
            .keys
            .get(key)
            .unwrap_or_else(|| panic!("no element keyed {key}"));
        handle(*index)
    }

    pub fn clicks(&self) -> Vec<NodeHandle> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn scrolls(&self) -> Vec<NodeHandle> {
        self.scrolls.lock().unwrap().clone()
    }

    pub fn releases(&self) -> usize {
        *self.releases.lock().unwrap()
    }

    /// Releases issued through forked views
    pub fn group_releases(&self) -> usize {
        *self.group_releases.lock().unwrap()
    }

    pub fn queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    fn mount(&mut self, element: El, parent: Option<usize>, created: Instant) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            tag: element.tag,
            attrs: element.attrs,
            text: element.text,
            children: Vec::new(),
            parent,
            hidden: element.hidden,
            handler: element.handler,
            broken: element.broken,
            appears_at: element.appears_after.map(|delay| created + delay),
        });
        if let Some(key) = element.key {
            self.keys.insert(key, index);
        }
        for child in element.children {
            let child = self.mount(child, Some(index), created);
            self.nodes[index].children.push(child);
        }
        index
    }

    fn resolve(&self, node: &NodeHandle) -> Result<usize, DriverError> {
        node.as_str()
            .strip_prefix('n')
            .and_then(|id| id.parse::<usize>().ok())
            .filter(|index| *index < self.nodes.len() && self.is_present(*index))
            .ok_or_else(|| DriverError::Detached(node.to_string()))
    }

    fn ancestry(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(index), move |current| self.nodes[*current].parent)
    }

    fn is_present(&self, index: usize) -> bool {
        let now = Instant::now();
        self.ancestry(index)
            .all(|i| self.nodes[i].appears_at.map_or(true, |at| now >= at))
    }

    fn visible(&self, index: usize) -> bool {
        self.ancestry(index).all(|i| !self.nodes[i].hidden)
    }

    fn descendants(&self, index: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[index].children {
            if self.is_present(child) {
                out.push(child);
                self.descendants(child, out);
            }
        }
    }

    fn text_content(&self, index: usize) -> String {
        let node = &self.nodes[index];
        let mut text = node.text.clone();
        for &child in &node.children {
            if self.is_present(child) {
                text.push_str(&self.text_content(child));
            }
        }
        text
    }

    fn extract_texts(&self, index: usize) -> Result<Value, DriverError> {
        let node = &self.nodes[index];
        if node.broken {
            return Err(DriverError::Script("extraction threw".to_string()));
        }

        let mut texts = Vec::new();
        let content = self.text_content(index);
        if !content.trim().is_empty() {
            texts.push(content.trim().to_string());
        }
        for name in TEXT_ATTRIBUTES {
            if let Some(value) = node.attr(name).filter(|v| !v.is_empty()) {
                texts.push(value.to_string());
            }
        }
        if let Some(classes) = node.attr("class") {
            texts.extend(classes.split_whitespace().map(str::to_string));
        }
        for (name, value) in &node.attrs {
            if name.starts_with("data-") {
                texts.push(value.clone());
            }
        }
        if node.tag == "svg" {
            if let Some(label) = node.attr("aria-label").filter(|v| !v.is_empty()) {
                texts.push(label.to_string());
            }
            let mut inner = Vec::new();
            self.descendants(index, &mut inner);
            if let Some(title) = inner.into_iter().find(|i| self.nodes[*i].tag == "title") {
                let title = self.text_content(title);
                if !title.is_empty() {
                    texts.push(title);
                }
            }
        }
        Ok(json!(texts))
    }

    fn nearest_clickable(&self, index: usize) -> usize {
        self.ancestry(index)
            .find(|i| {
                let node = &self.nodes[*i];
                is_clickable(&node.tag, |name| node.attr(name), node.handler)
            })
            .unwrap_or(index)
    }
}

fn handle(index: usize) -> NodeHandle {
    NodeHandle::new(format!("n{index}"))
}

#[async_trait]
impl PageDriver for FakePage {
    async fn query_all(
        &self,
        scope: QueryScope<'_>,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, DriverError> {
        *self.queries.lock().unwrap() += 1;
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((_, err)) = self.query_errors.iter().find(|(s, _)| s == selector) {
            return Err(err.clone());
        }
        let selector = Selector::parse(selector)?;
        let mut pool = Vec::new();
        match scope {
            QueryScope::Document => {
                pool.push(0);
                self.descendants(0, &mut pool);
            }
            QueryScope::Within(node) => {
                let root = self.resolve(node)?;
                self.descendants(root, &mut pool);
            }
        }
        Ok(pool
            .into_iter()
            .filter(|index| selector.matches(&self.nodes[*index]))
            .map(handle)
            .collect())
    }

    async fn is_visible(&self, node: &NodeHandle) -> Result<bool, DriverError> {
        let index = self.resolve(node)?;
        Ok(self.visible(index))
    }

    async fn evaluate(&self, node: &NodeHandle, script: PageScript) -> Result<Value, DriverError> {
        let index = self.resolve(node)?;
        match script {
            PageScript::ExtractTexts => self.extract_texts(index),
            PageScript::IsVisible => Ok(Value::Bool(self.visible(index))),
            PageScript::NearestClickable => Err(DriverError::Script(
                "nearest-clickable returns a node".to_string(),
            )),
        }
    }

    async fn evaluate_handle(
        &self,
        node: &NodeHandle,
        script: PageScript,
    ) -> Result<NodeHandle, DriverError> {
        let index = self.resolve(node)?;
        match script {
            PageScript::NearestClickable => Ok(handle(self.nearest_clickable(index))),
            other => Err(DriverError::Script(format!(
                "{} does not return a node",
                other.name()
            ))),
        }
    }

    async fn scroll_into_view(
        &self,
        node: &NodeHandle,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(node)?;
        self.scrolls.lock().unwrap().push(node.clone());
        Ok(())
    }

    async fn click(&self, node: &NodeHandle, _timeout: Duration) -> Result<(), DriverError> {
        self.resolve(node)?;
        if let Some(delay) = self.click_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.click_error {
            return Err(err.clone());
        }
        self.clicks.lock().unwrap().push(node.clone());
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<u8>, DriverError> {
        self.snapshot
            .clone()
            .ok_or_else(|| DriverError::Transport("screenshot failed".to_string()))
    }

    async fn release(&self) {
        *self.releases.lock().unwrap() += 1;
    }

    fn fork(&self) -> Option<Box<dyn PageDriver + '_>> {
        if !self.grouped {
            return None;
        }
        Some(Box::new(GroupView { page: self }))
    }
}

/// Forked view of a [`FakePage`]; everything but `release` goes to the page.
struct GroupView<'a> {
    page: &'a FakePage,
}

#[async_trait]
impl PageDriver for GroupView<'_> {
    async fn query_all(
        &self,
        scope: QueryScope<'_>,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, DriverError> {
        self.page.query_all(scope, selector).await
    }

    async fn is_visible(&self, node: &NodeHandle) -> Result<bool, DriverError> {
        self.page.is_visible(node).await
    }

    async fn evaluate(&self, node: &NodeHandle, script: PageScript) -> Result<Value, DriverError> {
        self.page.evaluate(node, script).await
    }

    async fn evaluate_handle(
        &self,
        node: &NodeHandle,
        script: PageScript,
    ) -> Result<NodeHandle, DriverError> {
        self.page.evaluate_handle(node, script).await
    }

    async fn scroll_into_view(
        &self,
        node: &NodeHandle,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.page.scroll_into_view(node, timeout).await
    }

    async fn click(&self, node: &NodeHandle, timeout: Duration) -> Result<(), DriverError> {
        self.page.click(node, timeout).await
    }

    async fn snapshot(&self) -> Result<Vec<u8>, DriverError> {
        self.page.snapshot().await
    }

    async fn release(&self) {
        *self.page.group_releases.lock().unwrap() += 1;
    }
}

/// The selector subset the resolver issues: comma lists of `tag`, `*`,
/// `[attr]` and `[attr="value"]` compounds.
struct Selector {
    alternatives: Vec<Compound>,
}

struct Compound {
    tag: Option<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    fn parse(selector: &str) -> Result<Self, DriverError> {
        let alternatives = selector
            .split(',')
            .map(|part| Compound::parse(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    fn matches(&self, node: &Node) -> bool {
        self.alternatives.iter().any(|compound| compound.matches(node))
    }
}

impl Compound {
    fn parse(text: &str) -> Result<Self, DriverError> {
        let invalid = || DriverError::Script(format!("unsupported selector {text:?}"));
        let split = text.find('[').unwrap_or(text.len());
        let (tag, mut rest) = text.split_at(split);
        let tag = match tag {
            "" | "*" => None,
            tag if tag.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Some(tag.to_ascii_lowercase())
            }
            _ => return Err(invalid()),
        };

        let mut attrs = Vec::new();
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
            let close = inner.find(']').ok_or_else(invalid)?;
            let (body, tail) = inner.split_at(close);
            rest = &tail[1..];
            match body.split_once('=') {
                Some((name, value)) => attrs.push((
                    name.trim().to_string(),
                    Some(value.trim().trim_matches('"').to_string()),
                )),
                None => attrs.push((body.trim().to_string(), None)),
            }
        }
        Ok(Self { tag, attrs })
    }

    fn matches(&self, node: &Node) -> bool {
        if self.tag.as_ref().is_some_and(|tag| *tag != node.tag) {
            return false;
        }
        self.attrs.iter().all(|(name, expected)| match (node.attr(name), expected) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}

/// `<table>` whose rows carry view/edit/delete icon buttons, keyed
/// `row-N` and `row-N-view` / `row-N-edit` / `row-N-delete`.
pub fn document_table(rows: usize) -> El {
    let body = (1..=rows).map(|n| {
        let button = |title: &str, icon: &str, action: &str| {
            el("button")
                .attr("title", &format!("{title} document"))
                .text(icon)
                .key(&format!("row-{n}-{action}"))
        };
        el("tr").key(&format!("row-{n}")).children([
            el("td").text(&format!("Document {n}")),
            el("td").children([
                button("View", "👁️", "view"),
                button("Edit", "✏️", "edit"),
                button("Delete", "🗑️", "delete"),
            ]),
        ])
    });
    el("table").child(el("tbody").children(body))
}
