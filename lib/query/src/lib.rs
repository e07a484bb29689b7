//! Classification and decomposition of SPARQL query text.
//!
//! The decomposer does not build an algebra. It extracts the structural [QueryParts] (prefixes,
//! graphs, triple and quad patterns, filters, variables) that are needed to index query results
//! by the data they depend on and to re-derive statements from update queries.

mod classify;
mod decompose;
mod error;
mod extract;
mod parts;
mod query;

pub use classify::{classify, QueryShape};
pub use error::QueryError;
pub use parts::*;
pub use query::{Query, QueryFactory};
