use crate::annotate::ProtocolContext;
use std::collections::BTreeMap;

/// Symbol -> description lookup for one protocol vocabulary.
///
/// Symbols are matched exactly as they appear in the document, including
/// synthetic index tokens such as `[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecMap {
    entries: BTreeMap<String, String>,
}

impl SpecMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the description it replaced (last write wins).
    pub fn insert(
        &mut self,
        symbol: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(symbol.into(), description.into())
    }

    /// Description for `symbol`. Entries with an empty description count as absent.
    pub fn describe(&self, symbol: &str) -> Option<&str> {
        self.entries
            .get(symbol)
            .map(String::as_str)
            .filter(|d| !d.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for SpecMap {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut map = SpecMap::new();
        for (symbol, description) in iter {
            map.insert(symbol, description);
        }
        map
    }
}

/// Both vocabularies, loaded once and passed explicitly through the walk.
#[derive(Debug, Clone, Default)]
pub struct SpecMaps {
    pub rpc: SpecMap,
    pub ui: SpecMap,
}

impl SpecMaps {
    pub fn new(rpc: SpecMap, ui: SpecMap) -> Self {
        Self { rpc, ui }
    }

    pub fn for_context(&self, context: ProtocolContext) -> &SpecMap {
        match context {
            ProtocolContext::RpcEnvelope => &self.rpc,
            ProtocolContext::UiPayload => &self.ui,
        }
    }
}
