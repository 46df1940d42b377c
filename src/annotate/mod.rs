//! Protocol annotation: classify, describe, and walk a JSON document.

pub mod context;
pub mod node;
pub mod resolve;
pub mod walk;

pub use context::ProtocolContext;
pub use walk::annotate;
