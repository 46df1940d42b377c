use crate::diagnostics;
use crate::specmap::error::SpecMapError;
use crate::specmap::table::{SpecMap, SpecMaps};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

const SYMBOL_COLUMN: &str = "Symbol";
const DESCRIPTION_COLUMN: &str = "Description";

// One field at the start of the remaining record, then its terminator.
// 1) quoted body ("" escapes a quote)
// 2) unquoted body
// 3) separator, empty at end of record
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"((?:[^"]|"")*)"|([^,]*))(,|$)"#).expect("field pattern compiles")
});

/// Load both spec maps. Either one failing aborts the run.
pub fn load_spec_maps(rpc_path: &str, ui_path: &str) -> Result<SpecMaps, SpecMapError> {
    let rpc = load_spec_map(rpc_path)?;
    let ui = load_spec_map(ui_path)?;
    Ok(SpecMaps::new(rpc, ui))
}

/// Load one `Symbol,Description` table from disk.
pub fn load_spec_map(path: &str) -> Result<SpecMap, SpecMapError> {
    if !Path::new(path).exists() {
        return Err(SpecMapError::ResourceMissing {
            path: path.to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| SpecMapError::Io {
        path: path.to_string(),
        source,
    })?;

    let map = parse_spec_map(&text, path)?;
    if map.is_empty() {
        diagnostics::warn(format!(
            "spec map {} has no entries; descriptions will come from fallbacks only",
            path
        ));
    }
    tracing::debug!(path, entries = map.len(), "loaded spec map");
    Ok(map)
}

/// Parse spec map text. `origin` only labels error messages.
///
/// Expected shape:
/// Symbol,Description
/// jsonrpc,"Protocol version, always ""2.0"""
pub fn parse_spec_map(text: &str, origin: &str) -> Result<SpecMap, SpecMapError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let malformed = |line: usize, reason: String| SpecMapError::ResourceMalformed {
        path: origin.to_string(),
        line,
        reason,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(lineno, line)| (lineno + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_lno, header) = lines
        .next()
        .ok_or_else(|| malformed(1, "missing header row".to_string()))?;
    let columns = split_record(header);
    let column = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| malformed(header_lno, format!("header has no {name:?} column")))
    };
    let symbol_idx = column(SYMBOL_COLUMN)?;
    let description_idx = column(DESCRIPTION_COLUMN)?;

    let mut map = SpecMap::new();
    for (lno, line) in lines {
        let mut fields = split_record(line);
        if fields.len() <= symbol_idx.max(description_idx) {
            return Err(malformed(
                lno,
                format!(
                    "expected at least {} fields, found {}",
                    symbol_idx.max(description_idx) + 1,
                    fields.len()
                ),
            ));
        }
        let description = std::mem::take(&mut fields[description_idx]);
        let symbol = std::mem::take(&mut fields[symbol_idx]);
        if let Some(prev) = map.insert(symbol.clone(), description) {
            tracing::debug!(
                origin,
                line = lno,
                symbol = %symbol,
                previous = %prev,
                "duplicate symbol overwritten"
            );
        }
    }

    Ok(map)
}

/// Split one record into fields. Unquoted fields are trimmed; quoted ones are kept verbatim.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = line;
    while let Some(caps) = FIELD_RE.captures(rest) {
        let field = match (caps.get(1), caps.get(2)) {
            (Some(quoted), _) => quoted.as_str().replace("\"\"", "\""),
            (None, Some(raw)) => raw.as_str().trim().to_string(),
            (None, None) => String::new(),
        };
        fields.push(field);

        let at_end = caps.get(3).is_none_or(|sep| sep.as_str().is_empty());
        if at_end {
            break;
        }
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }
    fields
}
