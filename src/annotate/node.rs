//! Annotated node model: the tree handed to downstream renderers.
//!
//! JSON shape (one object per input node):
//! {
//!   "protocol": "RpcEnvelope" | "UiPayload",
//!   "path": "root.params.surfaces",
//!   "key": "surfaces",
//!   "description": "...",
//!   "category": "Terminal" | "NonTerminal",
//!   "value": <scalar> | [ <child node>, ... ]
//! }

use crate::annotate::context::ProtocolContext;
use serde::Serialize;
use serde_json::Value;

/// Key and path of the document root.
pub const ROOT_KEY: &str = "root";

/// Path of member `name` under `parent`.
///
/// Plain names are appended as `.name`. Names that would make the path
/// ambiguous (containing `.`, `[` or `]`) are written as a JSON string in
/// brackets, e.g. `root["a.b"]`.
pub fn member_path(parent: &str, name: &str) -> String {
    if name.contains(['.', '[', ']']) {
        format!("{parent}[{}]", Value::String(name.to_owned()))
    } else {
        format!("{parent}.{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Terminal,
    NonTerminal,
}

/// Scalar payload for terminals, ordered children for composites.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeValue {
    Scalar(Value),
    Children(Vec<AnnotatedNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedNode {
    pub protocol: ProtocolContext,
    pub path: String,
    pub key: String,
    pub description: String,
    pub category: Category,
    pub value: NodeValue,
}

impl AnnotatedNode {
    pub fn is_terminal(&self) -> bool {
        self.category == Category::Terminal
    }

    /// Children in document order; empty for terminals.
    pub fn children(&self) -> &[AnnotatedNode] {
        match &self.value {
            NodeValue::Children(children) => children,
            NodeValue::Scalar(_) => &[],
        }
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

// Deep trees are torn down with a work-list instead of recursive drops.
impl Drop for AnnotatedNode {
    fn drop(&mut self) {
        let NodeValue::Children(children) = &mut self.value else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(mut node) = stack.pop() {
            if let NodeValue::Children(grandchildren) = &mut node.value {
                stack.append(grandchildren);
            }
        }
    }
}

/// Pre-order iterator backed by an explicit stack.
pub struct Iter<'a> {
    stack: Vec<&'a AnnotatedNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a AnnotatedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if !node.is_terminal() {
            self.stack.extend(node.children().iter().rev());
        }
        Some(node)
    }
}
