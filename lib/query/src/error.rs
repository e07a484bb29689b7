use crate::UpdateSubType;
use rdf_memo_model::InvalidTermValue;

/// An error raised while classifying or decomposing a query.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    /// None of the known query shapes matches the text.
    #[error("Unknown query type: {0}")]
    UnknownQueryType(String),
    /// The update was recognized but misses a clause its sub type requires.
    #[error("Malformed {sub_type} update: {reason}")]
    MalformedUpdate {
        /// The recognized sub type.
        sub_type: UpdateSubType,
        /// What is missing.
        reason: String,
    },
    /// A mandatory clause of the query could not be located.
    #[error("Missing {clause} clause in {shape}")]
    MissingClause {
        /// The clause, e.g., `WHERE`.
        clause: &'static str,
        /// The query shape that requires it.
        shape: &'static str,
    },
    /// The query has a recognized shape that is not supported.
    #[error("Unsupported query form: {0}")]
    UnsupportedQueryForm(String),
    /// A part of the query could not be turned into a term.
    #[error(transparent)]
    InvalidTerm(#[from] InvalidTermValue),
}
