use crate::{CacheEntry, PatternKey};
use rustc_hash::FxHashMap;

/// A value held by a [CacheStorage].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheValue {
    /// The ids of the queries indexed under a graph or a pattern key.
    QueryIds(Vec<String>),
    /// A cached query result.
    Entry(Box<CacheEntry>),
    /// The texts of queries that were remembered in the same transaction.
    Related(Vec<String>),
}

/// The key-value primitives the query cache is built on.
///
/// The primitives are assumed to be reliable. The cache is the only writer of its keys.
pub trait CacheStorage {
    fn get(&self, key: &str) -> Option<CacheValue>;

    fn set(&mut self, key: &str, value: CacheValue);

    fn delete(&mut self, key: &str);

    /// Returns all keys in lexical order.
    fn keys(&self) -> Vec<String>;
}

/// A [CacheStorage] that keeps its values in a hash map.
#[derive(Clone, Debug, Default)]
pub struct MemoryCacheStorage {
    values: FxHashMap<String, CacheValue>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn get(&self, key: &str) -> Option<CacheValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: CacheValue) {
        self.values.insert(key.to_owned(), value);
    }

    fn delete(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = self.values.keys().cloned().collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }
}

pub const GRAPH_PREFIX: &str = "graph/";
pub const QUERY_PREFIX: &str = "query/";
pub const PATTERN_PREFIX: &str = "pattern/";
pub const RELATED_PREFIX: &str = "related/";

pub(crate) fn graph_key(graph_id: &str) -> String {
    format!("{GRAPH_PREFIX}{graph_id}")
}

pub(crate) fn query_key(query_id: &str) -> String {
    format!("{QUERY_PREFIX}{query_id}")
}

pub(crate) fn pattern_key(key: &PatternKey) -> String {
    format!("{PATTERN_PREFIX}{key}")
}

pub(crate) fn related_key(related_id: &str) -> String {
    format!("{RELATED_PREFIX}{related_id}")
}
