use crate::TransactionId;
use rdf_memo_query::QueryError;
use rdf_memo_store::StoreError;

/// An error raised by a [QueryCache](crate::QueryCache).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A remembered query could not be decomposed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// An index entry that an invalidation step relies on is missing or holds another value.
    #[error("Cache index inconsistency: {0}")]
    IndexInconsistency(String),
    /// The transaction is not open.
    #[error("Unknown transaction {0}")]
    UnknownTransaction(TransactionId),
}

impl From<CacheError> for StoreError {
    fn from(error: CacheError) -> Self {
        match error {
            CacheError::Query(error) => Self::Query(error),
            CacheError::IndexInconsistency(message) => Self::CacheIndexInconsistency(message),
            error @ CacheError::UnknownTransaction(_) => Self::Other(Box::new(error)),
        }
    }
}
