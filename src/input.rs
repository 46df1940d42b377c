//! Input sniffing: decide whether a file holds anything worth annotating.
//!
//! The tool is pointed at arbitrary extracted message bodies, so absent,
//! empty, and non-JSON inputs are skipped rather than treated as errors.

use crate::Result;
use crate::diagnostics;
use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Read and parse the document at `path` (`-` for stdin).
///
/// Returns `Ok(None)` when there is nothing to annotate. Only real I/O
/// failures are errors; undecodable bytes are just "not JSON".
pub fn read_document(path: &str) -> Result<Option<Value>> {
    let bytes = if path == STDIN_PATH {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .with_context(|| diagnostics::error_message("read document from stdin"))?;
        buf
    } else {
        if !Path::new(path).exists() {
            tracing::info!(path, "input does not exist; nothing to annotate");
            return Ok(None);
        }
        fs::read(path)
            .with_context(|| diagnostics::error_message(format!("read document {}", path)))?
    };

    Ok(sniff(&bytes, path))
}

/// Parse `bytes` as JSON if they plausibly are JSON. `origin` only labels log lines.
pub fn sniff(bytes: &[u8], origin: &str) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        tracing::info!(origin, "input is empty; nothing to annotate");
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::info!(origin, error = %err, "input is not JSON; nothing to annotate");
            None
        }
    }
}
