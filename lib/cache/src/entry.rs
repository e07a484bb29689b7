use crate::PatternKey;
use rdf_memo_store::QueryResult;
use std::collections::{BTreeMap, BTreeSet};

/// A cached query result together with the index entries that refer to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// The query text.
    pub query: String,
    pub result: QueryResult,
    /// The ids of the graph indices that hold this entry.
    pub graph_ids: BTreeSet<String>,
    /// The pattern keys that hold this entry, grouped by graph id.
    pub pattern_keys: BTreeMap<String, BTreeSet<PatternKey>>,
    /// Links the entries that were remembered in the same transaction.
    pub related_entries_id: Option<String>,
}

impl CacheEntry {
    pub fn new(query: impl Into<String>, result: QueryResult) -> Self {
        Self {
            query: query.into(),
            result,
            graph_ids: BTreeSet::new(),
            pattern_keys: BTreeMap::new(),
            related_entries_id: None,
        }
    }

    /// Returns all pattern keys of this entry.
    pub fn all_pattern_keys(&self) -> impl Iterator<Item = &PatternKey> {
        self.pattern_keys.values().flatten()
    }

    pub(crate) fn add_pattern_key(&mut self, key: PatternKey) {
        self.pattern_keys
            .entry(key.graph_id.clone())
            .or_default()
            .insert(key);
    }
}
