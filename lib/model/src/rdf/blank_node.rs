use crate::InvalidTermValue;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static BLANK_NODE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9_\-.]*[A-Za-z0-9_\-])?$").unwrap()
});

/// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node).
///
/// Two blank nodes are the same node iff their identifiers are equal.
///
/// ```
/// use rdf_memo_model::BlankNode;
///
/// assert_eq!("_:a1", BlankNode::new("a1")?.to_string());
/// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct BlankNode {
    id: String,
}

impl BlankNode {
    /// Creates a blank node from a
    /// [blank node identifier](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node-identifier).
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidTermValue> {
        let id = id.into();
        if BLANK_NODE_ID.is_match(&id) {
            Ok(Self { id })
        } else {
            Err(InvalidTermValue::BlankNodeId(id))
        }
    }

    /// Creates a blank node without validating the identifier.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }
}

impl fmt::Display for BlankNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}
