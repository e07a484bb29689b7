//! Conversion of the records produced by external RDF parsers into terms and statements.

use crate::{BlankNode, InvalidTermValue, Literal, NamedNode, Statement, Term, Variable};
use std::str::FromStr;

/// The kind of term an external parser reports for a triple component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermRecordKind {
    Uri,
    Blank,
    Literal,
}

/// A triple component as reported by a record-oriented RDF parser.
///
/// The `value` is optional because such parsers report missing values instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermRecord {
    pub kind: TermRecordKind,
    pub value: Option<String>,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl TermRecord {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: TermRecordKind::Uri,
            value: Some(value.into()),
            language: None,
            datatype: None,
        }
    }

    pub fn blank(value: impl Into<String>) -> Self {
        Self {
            kind: TermRecordKind::Blank,
            value: Some(value.into()),
            language: None,
            datatype: None,
        }
    }

    pub fn literal(
        value: Option<String>,
        language: Option<String>,
        datatype: Option<String>,
    ) -> Self {
        Self {
            kind: TermRecordKind::Literal,
            value,
            language,
            datatype,
        }
    }
}

/// A triple as reported by a record-oriented RDF parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripleRecord {
    pub subject: TermRecord,
    pub predicate: TermRecord,
    pub object: TermRecord,
}

impl TryFrom<TermRecord> for Term {
    type Error = InvalidTermValue;

    fn try_from(record: TermRecord) -> Result<Self, Self::Error> {
        match record.kind {
            TermRecordKind::Uri => Ok(NamedNode::new(record.value.unwrap_or_default())?.into()),
            TermRecordKind::Blank => {
                let value = record.value.unwrap_or_default();
                let id = value.strip_prefix("_:").unwrap_or(&value);
                Ok(BlankNode::new(id)?.into())
            }
            TermRecordKind::Literal => {
                let value = record.value.ok_or(InvalidTermValue::MissingLiteralValue)?;
                let datatype = record.datatype.map(NamedNode::new).transpose()?;
                Ok(Literal::new(value, datatype, record.language.as_deref())?.into())
            }
        }
    }
}

impl TryFrom<TripleRecord> for Statement {
    type Error = InvalidTermValue;

    fn try_from(record: TripleRecord) -> Result<Self, Self::Error> {
        Ok(Statement::new_triple(
            Term::try_from(record.subject)?,
            Term::try_from(record.predicate)?,
            Term::try_from(record.object)?,
        ))
    }
}

impl TryFrom<oxrdf::NamedNode> for NamedNode {
    type Error = InvalidTermValue;

    fn try_from(node: oxrdf::NamedNode) -> Result<Self, Self::Error> {
        NamedNode::new(node.into_string())
    }
}

impl TryFrom<oxrdf::BlankNode> for BlankNode {
    type Error = InvalidTermValue;

    fn try_from(node: oxrdf::BlankNode) -> Result<Self, Self::Error> {
        BlankNode::new(node.as_str())
    }
}

impl TryFrom<oxrdf::Literal> for Literal {
    type Error = InvalidTermValue;

    fn try_from(literal: oxrdf::Literal) -> Result<Self, Self::Error> {
        match literal.language() {
            Some(language) => Literal::new_language_tagged_literal(literal.value(), language),
            None => Literal::new(
                literal.value(),
                Some(NamedNode::new(literal.datatype().as_str())?),
                None,
            ),
        }
    }
}

impl TryFrom<oxrdf::Term> for Term {
    type Error = InvalidTermValue;

    fn try_from(term: oxrdf::Term) -> Result<Self, Self::Error> {
        match term {
            oxrdf::Term::NamedNode(node) => Ok(NamedNode::try_from(node)?.into()),
            oxrdf::Term::BlankNode(node) => Ok(BlankNode::try_from(node)?.into()),
            oxrdf::Term::Literal(literal) => Ok(Literal::try_from(literal)?.into()),
            #[allow(unreachable_patterns, reason = "Only reachable with RDF-star enabled")]
            other => Err(InvalidTermValue::Unsupported(other.to_string())),
        }
    }
}

impl TryFrom<oxrdf::Subject> for Term {
    type Error = InvalidTermValue;

    fn try_from(subject: oxrdf::Subject) -> Result<Self, Self::Error> {
        Term::try_from(oxrdf::Term::from(subject))
    }
}

impl TryFrom<oxrdf::Triple> for Statement {
    type Error = InvalidTermValue;

    fn try_from(triple: oxrdf::Triple) -> Result<Self, Self::Error> {
        Ok(Statement::new_triple(
            Term::try_from(triple.subject)?,
            NamedNode::try_from(triple.predicate)?,
            Term::try_from(triple.object)?,
        ))
    }
}

impl TryFrom<oxrdf::Quad> for Statement {
    type Error = InvalidTermValue;

    fn try_from(quad: oxrdf::Quad) -> Result<Self, Self::Error> {
        let graph = match quad.graph_name {
            oxrdf::GraphName::NamedNode(node) => Some(NamedNode::try_from(node)?.into()),
            oxrdf::GraphName::BlankNode(node) => Some(BlankNode::try_from(node)?.into()),
            oxrdf::GraphName::DefaultGraph => None,
        };
        Ok(Statement::new(
            Term::try_from(quad.subject)?,
            NamedNode::try_from(quad.predicate)?,
            Term::try_from(quad.object)?,
            graph,
        ))
    }
}

impl FromStr for Term {
    type Err = InvalidTermValue;

    /// Parses a term from its canonical form.
    ///
    /// Variables use the SPARQL syntax (`?name`), everything else the N-Triples syntax.
    ///
    /// ```
    /// use rdf_memo_model::{Literal, Term};
    /// use std::str::FromStr;
    ///
    /// assert_eq!(
    ///     Term::from_str("\"foo\"@en")?,
    ///     Literal::new_language_tagged_literal("foo", "en")?.into()
    /// );
    /// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(name) = s.strip_prefix('?').or_else(|| s.strip_prefix('$')) {
            return Ok(Variable::new(name)?.into());
        }
        let term = oxrdf::Term::from_str(s).map_err(|error| InvalidTermValue::Parse {
            term: s.to_owned(),
            reason: error.to_string(),
        })?;
        Term::try_from(term)
    }
}
