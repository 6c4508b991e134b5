//! [`PageDriver`] over a flattened DevTools page session.
//!
//! Node handles are `Runtime` remote object ids. Every object a [`CdpPage`]
//! creates lives in that page's object group, released together by
//! [`PageDriver::release`]. Forks share the session but get a group each.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use intent_locator::{DriverError, NodeHandle, PageDriver, PageScript, QueryScope};
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{AdapterError, AdapterErrorKind};
use crate::transport::{CdpTransport, CommandTarget};

/// Object group of an attached [`CdpPage`]; forks append a sequence number
pub const OBJECT_GROUP: &str = "intent-locator";

static NEXT_GROUP: AtomicU64 = AtomicU64::new(1);

const QUERY_ALL_FN: &str = r#"
function(selector) {
    return Array.from(this.querySelectorAll(selector));
}
"#;

const HIT_TEST_FN: &str = r#"
function() {
    if (!this.isConnected) { return { status: 'detached' }; }
    const rect = this.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) { return { status: 'zero-size' }; }
    const x = rect.left + rect.width / 2;
    const y = rect.top + rect.height / 2;
    const hit = document.elementFromPoint(x, y);
    if (hit && hit !== this && !this.contains(hit)) {
        return { status: 'covered', by: hit.tagName.toLowerCase() };
    }
    return { status: 'ok', x, y };
}
"#;

/// One attached page target.
pub struct CdpPage {
    transport: Arc<dyn CdpTransport>,
    target_id: String,
    session_id: String,
    group: String,
}

impl CdpPage {
    /// Attach to `target_id` with a flattened session
    pub async fn attach(
        transport: Arc<dyn CdpTransport>,
        target_id: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        let target_id = target_id.into();
        let response = transport
            .send_command(
                CommandTarget::Browser,
                "Target.attachToTarget",
                json!({ "targetId": target_id, "flatten": true }),
            )
            .await?;

        let session_id = response
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdapterError::new(AdapterErrorKind::Internal)
                    .with_hint("attachToTarget returned no sessionId")
                    .with_data(response.clone())
            })?
            .to_string();

        info!(target: "cdp-page", %target_id, %session_id, "attached to page");
        Ok(Self {
            transport,
            target_id,
            session_id,
            group: OBJECT_GROUP.to_string(),
        })
    }

    /// Attach to the first `page` target the browser reports
    pub async fn attach_first_page(transport: Arc<dyn CdpTransport>) -> Result<Self, AdapterError> {
        let response = transport
            .send_command(CommandTarget::Browser, "Target.getTargets", json!({}))
            .await?;

        let target_id = response
            .get("targetInfos")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|info| info.get("type").and_then(Value::as_str) == Some("page"))
            .and_then(|info| info.get("targetId"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdapterError::new(AdapterErrorKind::TargetNotFound)
                    .with_hint("browser reports no page targets")
            })?
            .to_string();

        Self::attach(transport, target_id).await
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Object group this page's handles are issued into
    pub fn object_group(&self) -> &str {
        &self.group
    }

    /// Same session, fresh object group
    pub fn forked(&self) -> CdpPage {
        let sequence = NEXT_GROUP.fetch_add(1, Ordering::Relaxed);
        CdpPage {
            transport: self.transport.clone(),
            target_id: self.target_id.clone(),
            session_id: self.session_id.clone(),
            group: format!("{OBJECT_GROUP}-{sequence}"),
        }
    }

    async fn send_page_command(&self, method: &str, params: Value) -> Result<Value, AdapterError> {
        self.transport
            .send_command(CommandTarget::Session(self.session_id.clone()), method, params)
            .await
    }

    async fn document(&self) -> Result<String, AdapterError> {
        let response = self
            .send_page_command(
                "Runtime.evaluate",
                json!({ "expression": "document", "objectGroup": self.group }),
            )
            .await?;
        remote_object_id(&response, "document")
    }

    async fn call_on(
        &self,
        object_id: &str,
        declaration: &str,
        arguments: Vec<Value>,
        by_value: bool,
    ) -> Result<Value, AdapterError> {
        let response = self
            .send_page_command(
                "Runtime.callFunctionOn",
                json!({
                    "objectId": object_id,
                    "functionDeclaration": declaration.trim(),
                    "arguments": arguments,
                    "objectGroup": self.group,
                    "returnByValue": by_value,
                    "awaitPromise": false,
                }),
            )
            .await?;

        if let Some(details) = response.get("exceptionDetails") {
            let message = details
                .pointer("/exception/description")
                .or_else(|| details.get("text"))
                .and_then(Value::as_str)
                .unwrap_or("exception thrown");
            return Err(AdapterError::new(AdapterErrorKind::ScriptFailed)
                .with_hint(message.to_string())
                .with_data(details.clone()));
        }
        Ok(response)
    }

    async fn array_elements(&self, array_id: &str) -> Result<Vec<NodeHandle>, AdapterError> {
        let response = self
            .send_page_command(
                "Runtime.getProperties",
                json!({ "objectId": array_id, "ownProperties": true }),
            )
            .await?;

        let mut indexed: Vec<(usize, NodeHandle)> = response
            .get("result")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|property| {
                let index = property.get("name")?.as_str()?.parse::<usize>().ok()?;
                let object_id = property.pointer("/value/objectId")?.as_str()?;
                Some((index, NodeHandle::new(object_id)))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, node)| node).collect())
    }

    async fn query(
        &self,
        scope: QueryScope<'_>,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, AdapterError> {
        let root = match scope {
            QueryScope::Document => self.document().await?,
            QueryScope::Within(node) => node.as_str().to_string(),
        };

        let response = self
            .call_on(&root, QUERY_ALL_FN, vec![json!({ "value": selector })], false)
            .await?;
        let array_id = remote_object_id(&response, "querySelectorAll")?;
        let nodes = self.array_elements(&array_id).await?;

        debug!(target: "cdp-page", selector, count = nodes.len(), "queried elements");
        Ok(nodes)
    }

    async fn dispatch_click(&self, node: &NodeHandle) -> Result<(), AdapterError> {
        let response = self.call_on(node.as_str(), HIT_TEST_FN, Vec::new(), true).await?;
        let outcome = response.pointer("/result/value").cloned().unwrap_or(Value::Null);

        let point = match outcome.get("status").and_then(Value::as_str) {
            Some("ok") => outcome
                .get("x")
                .and_then(Value::as_f64)
                .zip(outcome.get("y").and_then(Value::as_f64)),
            Some("detached") => {
                return Err(AdapterError::new(AdapterErrorKind::ObjectNotFound)
                    .with_hint("element is no longer attached"))
            }
            Some(status) => {
                return Err(AdapterError::new(AdapterErrorKind::NotClickable)
                    .with_hint(status.to_string())
                    .with_data(outcome.clone()))
            }
            None => None,
        };
        let (x, y) = point.ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::Internal)
                .with_hint("hit test returned no point")
                .with_data(outcome.clone())
        })?;

        for kind in ["mousePressed", "mouseReleased"] {
            let payload = json!({
                "type": kind,
                "x": x,
                "y": y,
                "button": "left",
                "buttons": 1,
                "clickCount": 1,
                "pointerType": "mouse",
            });
            self.send_page_command("Input.dispatchMouseEvent", payload)
                .await?;
        }
        Ok(())
    }
}

fn remote_object_id(response: &Value, what: &str) -> Result<String, AdapterError> {
    response
        .pointer("/result/objectId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::ScriptFailed)
                .with_hint(format!("{what} did not return an object"))
        })
}

fn bounded_error(limit: Duration, what: &str) -> AdapterError {
    AdapterError::new(AdapterErrorKind::CommandTimeout)
        .with_hint(format!("{what} exceeded {}ms", limit.as_millis()))
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn query_all(
        &self,
        scope: QueryScope<'_>,
        selector: &str,
    ) -> Result<Vec<NodeHandle>, DriverError> {
        Ok(self.query(scope, selector).await?)
    }

    async fn is_visible(&self, node: &NodeHandle) -> Result<bool, DriverError> {
        let value = self.evaluate(node, PageScript::IsVisible).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn evaluate(&self, node: &NodeHandle, script: PageScript) -> Result<Value, DriverError> {
        let response = self
            .call_on(node.as_str(), script.source(), Vec::new(), true)
            .await?;
        Ok(response
            .pointer("/result/value")
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn evaluate_handle(
        &self,
        node: &NodeHandle,
        script: PageScript,
    ) -> Result<NodeHandle, DriverError> {
        let response = self
            .call_on(node.as_str(), script.source(), Vec::new(), false)
            .await?;
        Ok(NodeHandle::new(remote_object_id(&response, script.name())?))
    }

    async fn scroll_into_view(
        &self,
        node: &NodeHandle,
        limit: Duration,
    ) -> Result<(), DriverError> {
        let command = self.send_page_command(
            "DOM.scrollIntoViewIfNeeded",
            json!({ "objectId": node.as_str() }),
        );
        match timeout(limit, command).await {
            Ok(result) => result.map(|_| ()).map_err(DriverError::from),
            Err(_) => Err(bounded_error(limit, "scroll").into()),
        }
    }

    async fn click(&self, node: &NodeHandle, limit: Duration) -> Result<(), DriverError> {
        match timeout(limit, self.dispatch_click(node)).await {
            Ok(result) => result.map_err(DriverError::from),
            Err(_) => Err(bounded_error(limit, "click").into()),
        }
    }

    async fn snapshot(&self) -> Result<Vec<u8>, DriverError> {
        let response = self
            .send_page_command("Page.captureScreenshot", json!({ "format": "png" }))
            .await?;
        let data = response
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdapterError::new(AdapterErrorKind::Internal).with_hint("missing screenshot data")
            })?;
        let bytes = STANDARD
            .decode(data)
            .map_err(|err| AdapterError::new(AdapterErrorKind::Internal).with_hint(err.to_string()))?;
        Ok(bytes)
    }

    async fn release(&self) {
        if let Err(err) = self
            .send_page_command(
                "Runtime.releaseObjectGroup",
                json!({ "objectGroup": self.group }),
            )
            .await
        {
            warn!(target: "cdp-page", group = %self.group, %err, "failed to release object group");
        }
    }

    fn fork(&self) -> Option<Box<dyn PageDriver + '_>> {
        Some(Box::new(self.forked()))
    }
}
