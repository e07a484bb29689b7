//! RDF Memo keeps the results of SPARQL queries close to the caller and forgets them as soon as
//! the graphs they were computed from change.
//!
//! The crate bundles four parts:
//!
//! - [model]: terms and statements.
//! - [query]: classification and decomposition of query text.
//! - [store]: the [Store](store::Store) facade and an in-memory backend.
//! - [cache]: the [QueryCache](cache::QueryCache), a store that caches read queries of its
//!   successor.
//!
//! ```
//! use rdf_memo::cache::QueryCache;
//! use rdf_memo::io::RdfFormat;
//! use rdf_memo::model::{NamedNode, Statement, Variable};
//! use rdf_memo::store::{MemoryStore, Store};
//!
//! let graph = NamedNode::new("http://example.com/g")?;
//! let mut cache = QueryCache::in_memory(MemoryStore::default());
//! let file = b"<http://example.com/s> <http://example.com/p> \"o\" .";
//! cache.load_from_reader(RdfFormat::NTriples, file.as_ref(), Some(&graph))?;
//!
//! let pattern = Statement::new_triple(Variable::any(), Variable::any(), Variable::any());
//! assert_eq!(cache.get_matching_statements(&pattern, Some(&graph))?.len(), 1);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```
#![doc(test(attr(deny(warnings))))]

pub mod model {
    pub use rdf_memo_model::*;
}

pub mod query {
    pub use rdf_memo_query::*;
}

pub mod store {
    pub use rdf_memo_store::*;
}

pub mod cache {
    pub use rdf_memo_cache::*;
}

pub mod io {
    pub use oxrdfio::{RdfFormat, RdfParseError, RdfParser};
}
