use rdf_memo_model::Term;
use rdf_memo_query::{PatternTerm, TriplePatternPart};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// The graph id of the index that holds queries without an explicit graph.
///
/// These are queries over the default graph and queries with a `GRAPH ?g` block.
pub const UNSCOPED_GRAPH_ID: &str = "*";

const WILDCARD: &str = "*";
const SEPARATOR: char = '_';

/// Returns the hex encoded SHA-256 digest of `text`.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::new().chain_update(text).finalize())
}

/// A component of a [PatternKey].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    /// Anything that is not a named node.
    Wildcard,
    /// The fingerprint of a named node.
    Hash(String),
}

impl KeyPart {
    pub fn of_pattern(term: &PatternTerm) -> Self {
        if term.is_uri() {
            Self::Hash(fingerprint(&term.value))
        } else {
            Self::Wildcard
        }
    }

    pub fn of_term(term: &Term) -> Self {
        match term.as_named_node() {
            Some(node) => Self::Hash(fingerprint(node.as_str())),
            None => Self::Wildcard,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::Wildcard
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Hash(hash) => f.write_str(hash),
        }
    }
}

/// Identifies the shape of the data a triple pattern of a cached query could read.
///
/// The textual form is `graph_subject_predicate_object`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    pub graph_id: String,
    pub subject: KeyPart,
    pub predicate: KeyPart,
    pub object: KeyPart,
}

impl PatternKey {
    pub fn new(graph_id: impl Into<String>, pattern: &TriplePatternPart) -> Self {
        Self {
            graph_id: graph_id.into(),
            subject: KeyPart::of_pattern(&pattern.subject),
            predicate: KeyPart::of_pattern(&pattern.predicate),
            object: KeyPart::of_pattern(&pattern.object),
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.graph_id, self.subject, self.predicate, self.object
        )
    }
}

/// The error returned when a text is not a [PatternKey].
#[derive(Debug, thiserror::Error)]
#[error("Invalid pattern key: {0}")]
pub struct InvalidPatternKey(String);

impl FromStr for PatternKey {
    type Err = InvalidPatternKey;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let part = |part: &str| match part {
            WILDCARD => KeyPart::Wildcard,
            hash => KeyPart::Hash(hash.to_owned()),
        };
        let mut parts = key.split(SEPARATOR);
        let (Some(graph_id), Some(subject), Some(predicate), Some(object), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(InvalidPatternKey(key.to_owned()));
        };
        Ok(Self {
            graph_id: graph_id.to_owned(),
            subject: part(subject),
            predicate: part(predicate),
            object: part(object),
        })
    }
}
