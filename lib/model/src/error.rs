use std::fmt::{Display, Formatter};
use thiserror::Error;

/// An error raised when a term cannot be constructed from the given value.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidTermValue {
    /// The IRI does not pass the basic IRI syntax check.
    #[error("Invalid IRI '{0}'")]
    Iri(String),
    /// The blank node identifier contains characters that cannot be serialized.
    #[error("Invalid blank node identifier '{0}'")]
    BlankNodeId(String),
    /// The variable name is empty or contains characters that cannot be serialized.
    #[error("Invalid variable name '{0}'")]
    VariableName(String),
    /// A literal was built without a value.
    #[error("A literal requires a value")]
    MissingLiteralValue,
    /// The language tag is malformed.
    #[error("Invalid language tag '{0}'")]
    LanguageTag(String),
    /// A language-tagged literal was given a datatype other than `rdf:langString`.
    #[error("A literal with language tag '{language}' cannot have the datatype <{datatype}>")]
    LanguageDatatypeConflict {
        /// The language tag of the literal.
        language: String,
        /// The conflicting datatype.
        datatype: String,
    },
    /// The term is not supported by this model (e.g., RDF-star quoted triples).
    #[error("Unsupported term '{0}'")]
    Unsupported(String),
    /// The canonical form could not be parsed.
    #[error("Unable to parse term '{term}': {reason}")]
    Parse {
        /// The text that was parsed.
        term: String,
        /// The reason given by the parser.
        reason: String,
    },
}

/// An error raised when two patterns are matched against each other.
///
/// Matching is only defined if at least one side is concrete.
#[derive(Clone, Copy, Debug, Default, Error, PartialEq, Eq)]
pub struct PatternMatchError {}

impl Display for PatternMatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cannot match a pattern against another pattern.")
    }
}
