//! Pre-order annotation walk.
//!
//! Nesting depth is controlled by the input, so the walk never recurses:
//! frames go on an explicit stack, and finished nodes are assembled bottom-up
//! from the reversed visit order.

use crate::annotate::context::{ProtocolContext, classify};
use crate::annotate::node::{AnnotatedNode, Category, NodeValue, ROOT_KEY, member_path};
use crate::annotate::resolve::resolve;
use crate::specmap::SpecMaps;
use serde_json::Value;

/// A node waiting to be visited.
struct Frame<'v> {
    value: &'v Value,
    key: String,
    path: String,
    context: ProtocolContext,
}

enum Body {
    Scalar(Value),
    /// Number of direct children.
    Composite(usize),
}

/// A visited node whose children are not assembled yet.
struct Pending {
    protocol: ProtocolContext,
    path: String,
    key: String,
    description: String,
    body: Body,
}

/// Annotate a whole document under the root sentinel.
pub fn annotate(document: &Value, context: ProtocolContext, maps: &SpecMaps) -> AnnotatedNode {
    annotate_at(ROOT_KEY, document, ROOT_KEY, context, maps)
}

/// Annotate `value` as if it sat at `path` under `key`.
pub fn annotate_at(
    key: &str,
    value: &Value,
    path: &str,
    context: ProtocolContext,
    maps: &SpecMaps,
) -> AnnotatedNode {
    let mut stack = Vec::new();
    let root = visit(
        Frame {
            value,
            key: key.to_string(),
            path: path.to_string(),
            context,
        },
        maps,
        &mut stack,
    );

    // Pre-order: every node precedes its descendants.
    let mut visited = Vec::new();
    while let Some(frame) = stack.pop() {
        visited.push(visit(frame, maps, &mut stack));
    }

    // In reverse pre-order each node's children sit on top of `finished`,
    // first child uppermost.
    let mut finished: Vec<AnnotatedNode> = Vec::with_capacity(visited.len());
    for pending in visited.into_iter().rev() {
        let node = pending.finish(&mut finished);
        finished.push(node);
    }
    let tree = root.finish(&mut finished);
    tracing::debug!(nodes = tree.node_count(), protocol = ?tree.protocol, "annotated document");
    tree
}

/// Classify and describe one node, scheduling its children in document order.
fn visit<'v>(frame: Frame<'v>, maps: &SpecMaps, stack: &mut Vec<Frame<'v>>) -> Pending {
    let protocol = classify(frame.context, frame.value);
    let description = resolve(&frame.key, protocol, &frame.path, maps);

    let body = match frame.value {
        Value::Object(members) => {
            stack.extend(members.iter().rev().map(|(name, child)| Frame {
                value: child,
                key: name.clone(),
                path: member_path(&frame.path, name),
                context: protocol,
            }));
            Body::Composite(members.len())
        }
        Value::Array(items) => {
            stack.extend(items.iter().enumerate().rev().map(|(idx, child)| Frame {
                value: child,
                key: format!("[{idx}]"),
                path: format!("{}[{idx}]", frame.path),
                context: protocol,
            }));
            Body::Composite(items.len())
        }
        scalar => Body::Scalar(scalar.clone()),
    };

    Pending {
        protocol,
        path: frame.path,
        key: frame.key,
        description,
        body,
    }
}

impl Pending {
    fn finish(self, finished: &mut Vec<AnnotatedNode>) -> AnnotatedNode {
        let (category, value) = match self.body {
            Body::Scalar(value) => (Category::Terminal, NodeValue::Scalar(value)),
            Body::Composite(count) => {
                let mut children = finished.split_off(finished.len() - count);
                children.reverse();
                (Category::NonTerminal, NodeValue::Children(children))
            }
        };
        AnnotatedNode {
            protocol: self.protocol,
            path: self.path,
            key: self.key,
            description: self.description,
            category,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specmap::SpecMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeSet;

    use super::ProtocolContext::{RpcEnvelope, UiPayload};

    fn maps() -> SpecMaps {
        let rpc: SpecMap = [
            ("jsonrpc", "Protocol version; must be exactly \"2.0\"."),
            ("method", "Name of the method to be invoked."),
            ("id", "Request identifier echoed by the response."),
        ]
        .into_iter()
        .collect();
        let ui: SpecMap = [
            ("surfaces", "Map of surface ids to their root component ids."),
            ("components", "Flat list of component definitions."),
            ("id", "Component identifier referenced by surfaces and children."),
        ]
        .into_iter()
        .collect();
        SpecMaps::new(rpc, ui)
    }

    fn find<'a>(tree: &'a AnnotatedNode, path: &str) -> &'a AnnotatedNode {
        tree.iter()
            .find(|n| n.path == path)
            .unwrap_or_else(|| panic!("no node at {path}"))
    }

    /// Same branching and order as the input, and scalars carried over unchanged.
    fn assert_same_shape(input: &Value, node: &AnnotatedNode) {
        match input {
            Value::Object(members) => {
                assert_eq!(node.category, Category::NonTerminal, "{}", node.path);
                let keys: Vec<&str> = node.children().iter().map(|c| c.key.as_str()).collect();
                let expected: Vec<&str> = members.keys().map(String::as_str).collect();
                assert_eq!(keys, expected);
                for (child, (_, value)) in node.children().iter().zip(members) {
                    assert_same_shape(value, child);
                }
            }
            Value::Array(items) => {
                assert_eq!(node.category, Category::NonTerminal, "{}", node.path);
                assert_eq!(node.children().len(), items.len());
                for (idx, (child, value)) in node.children().iter().zip(items).enumerate() {
                    assert_eq!(child.key, format!("[{idx}]"));
                    assert_same_shape(value, child);
                }
            }
            scalar => {
                assert_eq!(node.category, Category::Terminal, "{}", node.path);
                assert_eq!(node.value, NodeValue::Scalar(scalar.clone()));
            }
        }
    }

    fn assert_monotonic(node: &AnnotatedNode) {
        for child in node.children() {
            assert!(
                child.protocol >= node.protocol,
                "{} reverted to {:?}",
                child.path,
                child.protocol
            );
            assert_monotonic(child);
        }
    }

    fn corpus() -> Vec<Value> {
        vec![
            json!({"jsonrpc": "2.0", "method": "ping", "id": 1}),
            json!({"jsonrpc": "2.0", "method": "render",
                   "params": {"surfaces": {"main": ["c1"]},
                              "components": [{"id": "c1", "type": "text"}]}}),
            json!([{"surfaces": {}}, {"surfaces": {}}]),
            json!({}),
            json!([]),
            json!("bare string"),
            json!([1, "two", 3.5, true, null, {"a": [[], {}]}]),
            json!({"result": {"nested": {"components": [{"props": {"color": "red"}}]}},
                   "error": {"code": -32600, "data": {"why": "bad"}}}),
            json!({"a.b": 1, "a": {"b": 2}, "[0]": [3], "x]": {"y": 4}}),
        ]
    }

    #[test]
    fn scenario_simple_request_stays_rpc() {
        let doc = json!({"jsonrpc": "2.0", "method": "ping", "id": 1});
        let tree = annotate(&doc, RpcEnvelope, &maps());

        assert_eq!(tree.protocol, RpcEnvelope);
        assert_eq!(tree.path, "root");
        assert_eq!(tree.key, "root");
        let method = find(&tree, "root.method");
        assert_eq!(method.protocol, RpcEnvelope);
        assert_eq!(method.description, "Name of the method to be invoked.");
        assert_eq!(method.value, NodeValue::Scalar(json!("ping")));

        // Unmapped top-level members fall to the extension rule.
        let bare = annotate(&doc, RpcEnvelope, &SpecMaps::default());
        assert_eq!(
            find(&bare, "root.method").description,
            "Protocol extension 'method': non-standard top-level member of the RPC envelope."
        );
    }

    #[test]
    fn scenario_gateway_inside_params() {
        let doc = json!({"jsonrpc": "2.0", "method": "render",
                         "params": {"surfaces": {"main": ["c1"]},
                                    "components": [{"id": "c1", "type": "text"}]}});
        let tree = annotate(&doc, RpcEnvelope, &maps());

        assert_eq!(find(&tree, "root").protocol, RpcEnvelope);
        assert_eq!(find(&tree, "root.jsonrpc").protocol, RpcEnvelope);
        assert_eq!(find(&tree, "root.method").protocol, RpcEnvelope);

        let params = find(&tree, "root.params");
        assert_eq!(params.protocol, UiPayload);
        for node in params.iter() {
            assert_eq!(node.protocol, UiPayload, "{}", node.path);
        }

        let id = find(&tree, "root.params.components[0].id");
        assert_eq!(
            id.description,
            "Component identifier referenced by surfaces and children."
        );
    }

    #[test]
    fn scenario_batch_of_payloads_switches_at_the_array() {
        let doc = json!([{"surfaces": {}}, {"surfaces": {}}]);
        let tree = annotate(&doc, RpcEnvelope, &maps());
        let protocols: Vec<ProtocolContext> = tree.iter().map(|n| n.protocol).collect();
        assert_eq!(protocols, vec![UiPayload; 5]);
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "root",
                "root[0]",
                "root[0].surfaces",
                "root[1]",
                "root[1].surfaces"
            ]
        );
    }

    #[test]
    fn scenario_empty_object() {
        let tree = annotate(&json!({}), RpcEnvelope, &maps());
        assert_eq!(tree.category, Category::NonTerminal);
        assert_eq!(tree.value, NodeValue::Children(vec![]));
        assert!(!tree.description.is_empty());
    }

    #[test]
    fn scenario_props_heuristic_under_ui() {
        let doc = json!({"foo": {"props": {"color": "red"}}});
        let tree = annotate_at("ui", &doc, "root.components[0]", UiPayload, &maps());
        let color = find(&tree, "root.components[0].foo.props.color");
        assert_eq!(color.protocol, UiPayload);
        assert_eq!(
            color.description,
            "Component property 'color': configures how the enclosing UI component renders."
        );
    }

    #[test]
    fn initial_ui_context_is_kept_everywhere() {
        let doc = json!({"jsonrpc": "2.0", "params": [1, 2]});
        let tree = annotate(&doc, UiPayload, &maps());
        assert!(tree.iter().all(|n| n.protocol == UiPayload));
    }

    #[test]
    fn gateway_is_local_to_its_subtree() {
        let doc = json!({"params": {"components": []}, "result": {"a": 1}});
        let tree = annotate(&doc, RpcEnvelope, &maps());
        assert_eq!(find(&tree, "root.params").protocol, UiPayload);
        assert_eq!(find(&tree, "root.result").protocol, RpcEnvelope);
        assert_eq!(find(&tree, "root.result.a").protocol, RpcEnvelope);
    }

    #[test]
    fn output_mirrors_input_shape() {
        for doc in corpus() {
            let tree = annotate(&doc, RpcEnvelope, &maps());
            assert_same_shape(&doc, &tree);
        }
    }

    #[test]
    fn context_never_reverts() {
        for doc in corpus() {
            assert_monotonic(&annotate(&doc, RpcEnvelope, &maps()));
        }
    }

    #[test]
    fn paths_are_unique_and_descriptions_present() {
        for doc in corpus() {
            let tree = annotate(&doc, RpcEnvelope, &maps());
            let mut seen = BTreeSet::new();
            for node in tree.iter() {
                assert!(seen.insert(node.path.clone()), "duplicate path {}", node.path);
                assert!(!node.description.is_empty(), "{}", node.path);
            }
        }
    }

    #[test]
    fn dotted_member_names_do_not_collide() {
        let doc = json!({"a.b": 1, "a": {"b": 2}});
        let tree = annotate(&doc, RpcEnvelope, &maps());
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["root", r#"root["a.b"]"#, "root.a", "root.a.b"]);
        assert_eq!(find(&tree, r#"root["a.b"]"#).key, "a.b");
    }

    #[test]
    fn annotation_is_deterministic() {
        for doc in corpus() {
            assert_eq!(
                annotate(&doc, RpcEnvelope, &maps()),
                annotate(&doc, RpcEnvelope, &maps())
            );
        }
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        const DEPTH: usize = 5_000;
        let mut doc = json!("leaf");
        for _ in 0..DEPTH {
            doc = Value::Array(vec![doc]);
        }

        let tree = annotate(&doc, RpcEnvelope, &SpecMaps::default());
        assert_eq!(tree.node_count(), DEPTH + 1);
        let deepest = tree.iter().last().unwrap();
        assert_eq!(deepest.value, NodeValue::Scalar(json!("leaf")));
        assert_eq!(deepest.path.len(), "root".len() + 3 * DEPTH);
        drop(tree);

        // serde_json drops nested values recursively.
        std::mem::forget(doc);
    }
}
