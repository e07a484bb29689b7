//! A cache for the results of queries that is invalidated when the underlying graphs change.
//!
//! The cache is a [Store](rdf_memo_store::Store) that sits in front of another store. Its state
//! lives in a [CacheStorage] under the following keys:
//!
//! - `query/<query id>`: the [CacheEntry] of a query.
//! - `graph/<graph id>`: the ids of the queries that read a graph.
//! - `pattern/<pattern key>`: the ids of the queries with a triple pattern of that [PatternKey].
//! - `related/<related id>`: the texts of the queries remembered in the same transaction.
//!
//! Query ids and graph ids are [fingerprint]s of the query text and the graph IRI.

mod cache;
mod entry;
mod error;
mod fingerprint;
mod storage;
mod transaction;

pub use cache::QueryCache;
pub use entry::CacheEntry;
pub use error::CacheError;
pub use fingerprint::{fingerprint, InvalidPatternKey, KeyPart, PatternKey, UNSCOPED_GRAPH_ID};
pub use storage::{
    CacheStorage, CacheValue, MemoryCacheStorage, GRAPH_PREFIX, PATTERN_PREFIX, QUERY_PREFIX,
    RELATED_PREFIX,
};
pub use transaction::TransactionId;
