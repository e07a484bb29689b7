use oxrdfio::RdfParseError;
use rdf_memo_model::InvalidTermValue;
use rdf_memo_query::QueryError;
use std::error::Error;

/// An error raised by a [Store](crate::Store).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The query text could not be classified or decomposed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// A term could not be constructed.
    #[error(transparent)]
    InvalidTerm(#[from] InvalidTermValue),
    /// A statement operation requires a graph, but neither the caller nor the statement gives one.
    #[error("No graph specified for statement {0}")]
    NoGraphSpecified(String),
    /// An operation that requires concrete statements received a pattern.
    #[error("Statement {0} is a pattern, a concrete statement is required")]
    NonConcreteStatement(String),
    /// The backend answered with a result of another kind than the query requires.
    #[error("Expected {expected} as query result, found {found}")]
    UnexpectedResult {
        expected: &'static str,
        found: String,
    },
    /// A query could not be answered locally and there is no store to forward it to.
    #[error("No successor is configured to answer the query: {0}")]
    NoChainSuccessor(String),
    /// An RDF document could not be parsed.
    #[error(transparent)]
    Parsing(#[from] RdfParseError),
    /// The graph created by `CREATE GRAPH` already exists.
    #[error("The graph <{0}> already exists")]
    GraphAlreadyExists(String),
    /// The graph dropped by `DROP GRAPH` does not exist.
    #[error("The graph <{0}> does not exist")]
    GraphDoesNotExist(String),
    /// The indices of a query cache are not consistent with its entries.
    #[error("Cache index inconsistency: {0}")]
    CacheIndexInconsistency(String),
    /// A failure of a backend, e.g., of the transport to a remote store.
    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}
