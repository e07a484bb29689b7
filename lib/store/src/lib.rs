//! The store facade: statement operations on top of query text, and an in-memory backend.

mod batch;
mod error;
mod memory;
mod results;
pub mod sparql;
mod store;

pub use batch::{StatementBatcher, DEFAULT_BATCH_SIZE};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use results::{QueryResult, QuerySolutions, StatementIterator};
pub use store::{resolve_graph, resolve_statements, statements_from_parts, Store};
