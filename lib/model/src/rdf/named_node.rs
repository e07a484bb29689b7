use crate::InvalidTermValue;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A scheme of at least two characters, a colon and at least one character that may appear
/// between angle brackets in N-Triples.
static IRI_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[a-zA-Z][a-zA-Z0-9+.\-]+:[^\x00-\x20\x7F<>"{}|\\^`\[\]]+$"#).unwrap()
});

/// Returns whether `iri` passes the basic IRI syntax check used by [NamedNode::new].
pub fn is_valid_iri(iri: &str) -> bool {
    IRI_SYNTAX.is_match(iri)
}

/// An RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
///
/// The default string formatter is returning an N-Triples, Turtle and SPARQL compatible
/// representation.
///
/// ```
/// use rdf_memo_model::NamedNode;
///
/// assert_eq!(
///     "<http://example.com/foo>",
///     NamedNode::new("http://example.com/foo")?.to_string()
/// );
/// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Builds and validates an RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
    pub fn new(iri: impl Into<String>) -> Result<Self, InvalidTermValue> {
        let iri = iri.into();
        if is_valid_iri(&iri) {
            Ok(Self { iri })
        } else {
            Err(InvalidTermValue::Iri(iri))
        }
    }

    /// Builds an RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri) from a string.
    ///
    /// It is the caller's responsibility to ensure that `iri` is a valid IRI.
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    pub fn as_str(&self) -> &str {
        self.iri.as_str()
    }

    pub fn into_string(self) -> String {
        self.iri
    }
}

impl fmt::Display for NamedNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

impl PartialEq<str> for NamedNode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for NamedNode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_iris() {
        assert!(NamedNode::new("http://example.com/foo#bar").is_ok());
        assert!(NamedNode::new("urn:isbn:0451450523").is_ok());
        assert!(NamedNode::new("mailto:someone@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_iris() {
        for iri in [
            "",
            "example",
            "h:foo",
            "1http://example.com",
            "http:",
            "http://example.com/a b",
            "http://example.com/<a>",
            "http://example.com/{a}",
            "http://example.com/a|b",
            "http://example.com/a\\b",
            "http://example.com/a^b",
            "http://example.com/a`b",
            "http://[::1]/",
            "http://example.com/\n",
        ] {
            assert_eq!(
                NamedNode::new(iri),
                Err(InvalidTermValue::Iri(iri.to_owned())),
                "{iri:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_wraps_in_angle_brackets() {
        assert_eq!(
            NamedNode::new_unchecked("http://example.com/").to_string(),
            "<http://example.com/>"
        );
    }
}
