//! Protocol contexts and gateway detection.
//!
//! A document starts under the RPC envelope vocabulary. Seeing a UI payload
//! sentinel key switches the subtree to the UI vocabulary, and that switch
//! is never undone further down.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Member names that mark an embedded UI payload.
pub const UI_SENTINEL_KEYS: [&str; 2] = ["surfaces", "components"];

/// Vocabulary a node is interpreted under. Ordered: `RpcEnvelope < UiPayload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ProtocolContext {
    RpcEnvelope,
    UiPayload,
}

impl ProtocolContext {
    /// Human label used inside descriptions.
    pub fn label(self) -> &'static str {
        match self {
            ProtocolContext::RpcEnvelope => "JSON-RPC envelope",
            ProtocolContext::UiPayload => "A2UI payload",
        }
    }
}

impl fmt::Display for ProtocolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decide the context propagated to `value`'s children.
///
/// Once under `UiPayload` nothing is re-evaluated.
pub fn classify(current: ProtocolContext, value: &Value) -> ProtocolContext {
    if current == ProtocolContext::UiPayload {
        return current;
    }
    let is_gateway = match value {
        Value::Object(_) => has_sentinel(value),
        // Batch peek: only the first element is inspected.
        Value::Array(items) => items.first().is_some_and(has_sentinel),
        _ => false,
    };
    if is_gateway {
        ProtocolContext::UiPayload
    } else {
        current
    }
}

fn has_sentinel(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| UI_SENTINEL_KEYS.iter().any(|k| obj.contains_key(*k)))
}
