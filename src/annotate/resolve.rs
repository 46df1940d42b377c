//! Description resolution.
//!
//! Order: exact spec-map entry for the context, then the first matching
//! structural rule from [`RULES`], then a catch-all. Every branch yields a
//! non-empty string.
//!
//! The document root is never looked up in the spec maps: its key is the
//! `root` sentinel, which vocabularies may also define for a real member.

use crate::annotate::context::ProtocolContext;
use crate::annotate::node::{ROOT_KEY, member_path};
use crate::specmap::SpecMaps;

/// A structural fallback keyed on the node's key and path.
struct Rule {
    context: ProtocolContext,
    matches: fn(key: &str, path: &str) -> bool,
    describe: fn(key: &str) -> String,
}

/// Evaluated top to bottom; more specific path markers first.
static RULES: &[Rule] = &[
    // UI payload
    Rule {
        context: ProtocolContext::UiPayload,
        matches: under_props,
        describe: component_property,
    },
    Rule {
        context: ProtocolContext::UiPayload,
        matches: under_data,
        describe: bound_state,
    },
    Rule {
        context: ProtocolContext::UiPayload,
        matches: under_events,
        describe: interaction_handler,
    },
    Rule {
        context: ProtocolContext::UiPayload,
        matches: under_children,
        describe: component_reference,
    },
    Rule {
        context: ProtocolContext::UiPayload,
        matches: always,
        describe: ui_structural,
    },
    // RPC envelope
    Rule {
        context: ProtocolContext::RpcEnvelope,
        matches: is_index_token,
        describe: batch_member,
    },
    Rule {
        context: ProtocolContext::RpcEnvelope,
        matches: under_params,
        describe: method_parameter,
    },
    Rule {
        context: ProtocolContext::RpcEnvelope,
        matches: under_error,
        describe: error_detail,
    },
    Rule {
        context: ProtocolContext::RpcEnvelope,
        matches: is_top_level,
        describe: protocol_extension,
    },
];

/// Best available description for a node.
pub fn resolve(key: &str, context: ProtocolContext, path: &str, maps: &SpecMaps) -> String {
    let exact = if key == ROOT_KEY && path == ROOT_KEY {
        None
    } else {
        maps.for_context(context).describe(key)
    };
    if let Some(description) = exact {
        return description.to_string();
    }
    RULES
        .iter()
        .filter(|rule| rule.context == context)
        .find(|rule| (rule.matches)(key, path))
        .map(|rule| (rule.describe)(key))
        .unwrap_or_else(|| format!("Application-specific member within the {context} context."))
}

/// True if `path` has `.{segment}` as a whole member segment.
fn has_segment(path: &str, segment: &str) -> bool {
    member_segments(path).any(|member| member == segment)
}

/// Plain `.name` segments of `path`; index and quoted `["..."]` segments are skipped.
fn member_segments(path: &str) -> impl Iterator<Item = &str> {
    let mut rest = path;
    std::iter::from_fn(move || {
        loop {
            if let Some(body) = rest.strip_prefix('.') {
                let end = body.find(['.', '[']).unwrap_or(body.len());
                rest = &body[end..];
                return Some(&body[..end]);
            }
            if rest.starts_with('[') {
                rest = skip_bracketed(rest);
                continue;
            }
            if rest.is_empty() {
                return None;
            }
            // Leading token, normally the root sentinel.
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            rest = &rest[end..];
        }
    })
}

/// Remainder of `path` after the bracketed segment it starts with.
fn skip_bracketed(path: &str) -> &str {
    let mut quoted = false;
    let mut escaped = false;
    for (idx, c) in path.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ']' if !quoted => return &path[idx + 1..],
            _ => {}
        }
    }
    ""
}

fn under_props(_: &str, path: &str) -> bool {
    has_segment(path, "props")
}

fn under_data(_: &str, path: &str) -> bool {
    has_segment(path, "data")
}

fn under_events(_: &str, path: &str) -> bool {
    has_segment(path, "events")
}

fn under_children(_: &str, path: &str) -> bool {
    has_segment(path, "children")
}

fn under_params(_: &str, path: &str) -> bool {
    has_segment(path, "params")
}

fn under_error(_: &str, path: &str) -> bool {
    has_segment(path, "error")
}

fn always(_: &str, _: &str) -> bool {
    true
}

fn is_index_token(key: &str, _: &str) -> bool {
    key.starts_with('[')
}

// The root itself, or a direct member of it.
fn is_top_level(key: &str, path: &str) -> bool {
    path == ROOT_KEY || path == member_path(ROOT_KEY, key)
}

fn component_property(key: &str) -> String {
    format!("Component property '{key}': configures how the enclosing UI component renders.")
}

fn bound_state(_: &str) -> String {
    "Dynamic bound state: a data-model value bound into the UI at render time.".to_string()
}

fn interaction_handler(key: &str) -> String {
    format!("Interaction handler '{key}': action dispatched when the user interacts with the component.")
}

fn component_reference(_: &str) -> String {
    "Nested component reference: points at a child component in the UI tree.".to_string()
}

fn ui_structural(key: &str) -> String {
    format!("Structural element '{key}' of the declarative UI tree.")
}

fn batch_member(_: &str) -> String {
    "Batch member: one request or response within a JSON-RPC batch.".to_string()
}

fn method_parameter(key: &str) -> String {
    format!("Method parameter '{key}' passed to the invoked procedure.")
}

fn error_detail(key: &str) -> String {
    format!("Error detail '{key}' describing why the call failed.")
}

fn protocol_extension(key: &str) -> String {
    format!("Protocol extension '{key}': non-standard top-level member of the RPC envelope.")
}
