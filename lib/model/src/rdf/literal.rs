use crate::vocab::{rdf, xsd};
use crate::{InvalidTermValue, NamedNode};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]{1,8}(?:-[a-zA-Z0-9]{1,8})*$").unwrap()
});

/// An owned RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
///
/// Every literal has a datatype. A literal without an explicit datatype is an `xsd:string`, a
/// literal with a language tag is always an `rdf:langString`.
///
/// The default string formatter is returning an N-Triples compatible representation:
/// ```
/// use rdf_memo_model::vocab::xsd;
/// use rdf_memo_model::{Literal, NamedNode};
///
/// assert_eq!(
///     "\"foo\\nbar\"",
///     Literal::new_simple_literal("foo\nbar").to_string()
/// );
///
/// assert_eq!(
///     "\"1999-01-01\"^^<http://www.w3.org/2001/XMLSchema#date>",
///     Literal::new_typed_literal("1999-01-01", NamedNode::new("http://www.w3.org/2001/XMLSchema#date")?).to_string()
/// );
///
/// assert_eq!(
///     "\"foo\"@en",
///     Literal::new_language_tagged_literal("foo", "en")?.to_string()
/// );
/// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Literal {
    value: String,
    datatype: NamedNode,
    language: Option<String>,
}

impl Literal {
    /// Builds a literal from its parts.
    ///
    /// - Without a datatype and a language, the datatype is `xsd:string`.
    /// - With a language, the datatype defaults to `rdf:langString`. Any other explicit datatype
    ///   is rejected.
    pub fn new(
        value: impl Into<String>,
        datatype: Option<NamedNode>,
        language: Option<&str>,
    ) -> Result<Self, InvalidTermValue> {
        match (datatype, language) {
            (datatype, Some(language)) => {
                if let Some(datatype) = datatype.filter(|dt| dt.as_str() != rdf::LANG_STRING) {
                    return Err(InvalidTermValue::LanguageDatatypeConflict {
                        language: language.to_owned(),
                        datatype: datatype.into_string(),
                    });
                }
                Self::new_language_tagged_literal(value, language)
            }
            (Some(datatype), None) => Ok(Self::new_typed_literal(value, datatype)),
            (None, None) => Ok(Self::new_simple_literal(value)),
        }
    }

    /// Builds an RDF [simple literal](https://www.w3.org/TR/rdf11-concepts/#dfn-simple-literal).
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: NamedNode::new_unchecked(xsd::STRING),
            language: None,
        }
    }

    /// Builds an RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal) with a
    /// [datatype](https://www.w3.org/TR/rdf11-concepts/#dfn-datatype-iri).
    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// Builds an RDF [language-tagged string](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tagged-string).
    ///
    /// The language tag is kept as given.
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: &str,
    ) -> Result<Self, InvalidTermValue> {
        if !LANGUAGE_TAG.is_match(language) {
            return Err(InvalidTermValue::LanguageTag(language.to_owned()));
        }
        Ok(Self {
            value: value.into(),
            datatype: NamedNode::new_unchecked(rdf::LANG_STRING),
            language: Some(language.to_owned()),
        })
    }

    /// The literal [lexical form](https://www.w3.org/TR/rdf11-concepts/#dfn-lexical-form).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The literal [language tag](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tag) if it
    /// is a [language-tagged string](https://www.w3.org/TR/rdf11-concepts/#dfn-language-tagged-string).
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// The literal [datatype](https://www.w3.org/TR/rdf11-concepts/#dfn-datatype-iri).
    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    /// Returns whether this is an `xsd:string` without language tag.
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.as_str() == xsd::STRING
    }
}

impl fmt::Display for Literal {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_string(&self.value))?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if self.datatype.as_str() == xsd::STRING {
            Ok(())
        } else {
            write!(f, "^^{}", self.datatype)
        }
    }
}

/// Escapes a string so that it can be written between double quotes in N-Triples and SPARQL.
pub fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('"', "\\\"")
}
