//! JSON Schema check for the annotated output.
//!
//! Runs only when requested on the command line. The default schema is the
//! one shipped in `schemas/annotated-node.schema.json`.

use crate::Result;
use crate::diagnostics;
use anyhow::{Context, anyhow, bail};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fs;

const DEFAULT_SCHEMA: &str = include_str!("../schemas/annotated-node.schema.json");

pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    /// Compile the schema at `path`, or the embedded annotated-node schema.
    pub fn new(path: Option<&str>) -> Result<Self> {
        let schema: Value = match path {
            Some(path) => {
                let text = fs::read_to_string(path).with_context(|| {
                    diagnostics::error_message(format!("read schema file {}", path))
                })?;
                serde_json::from_str(&text).with_context(|| {
                    diagnostics::error_message(format!("parse schema file {}", path))
                })?
            }
            None => serde_json::from_str(DEFAULT_SCHEMA)
                .with_context(|| diagnostics::error_message("parse embedded schema"))?,
        };

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| anyhow!(diagnostics::error_message(format!("compile schema: {}", e))))?;

        Ok(Self { compiled })
    }

    /// Validate `instance`, reporting every failure with its location.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details: Vec<String> = errors
                .map(|e| format!("{} at {}", e, e.instance_path))
                .collect();
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "schema validation failed ({} errors):\n  {}",
                    details.len(),
                    details.join("\n  ")
                ))
            );
        }
        tracing::debug!("schema validation passed");
        Ok(())
    }
}
