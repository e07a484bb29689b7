use crate::{BlankNode, Literal, NamedNode, PatternMatchError, Variable};
use std::fmt;

/// An RDF [term](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-term) or a pattern variable.
///
/// Named nodes, blank nodes and literals are *concrete*. Variables are *patterns* that match any
/// concrete term.
///
/// The default string formatter is returning the canonical N-Triples/N-Quads (or SPARQL, for
/// variables) representation:
/// ```
/// use rdf_memo_model::{Literal, Term};
///
/// assert_eq!("\"foo\"@en", Term::from(Literal::new_language_tagged_literal("foo", "en")?).to_string());
/// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
}

impl Term {
    #[inline]
    pub fn is_named_node(&self) -> bool {
        matches!(self, Self::NamedNode(_))
    }

    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns whether this term identifies a single node or value, i.e., is not a variable.
    #[inline]
    pub fn is_concrete(&self) -> bool {
        !self.is_variable()
    }

    /// Returns the named node if this term is one.
    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            Self::NamedNode(node) => Some(node),
            _ => None,
        }
    }

    /// Checks whether `other` is matched by this term.
    ///
    /// - A concrete term only matches an equal term.
    /// - A variable matches every concrete term.
    /// - Matching two variables is undefined and returns an error.
    pub fn matches(&self, other: &Term) -> Result<bool, PatternMatchError> {
        match (self, other) {
            (Self::Variable(_), Self::Variable(_)) => Err(PatternMatchError::default()),
            (Self::Variable(_), _) => Ok(true),
            _ => Ok(self == other),
        }
    }
}

impl fmt::Display for Term {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode(node) => node.fmt(f),
            Self::BlankNode(node) => node.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
            Self::Variable(variable) => variable.fmt(f),
        }
    }
}

impl From<NamedNode> for Term {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<Literal> for Term {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<Variable> for Term {
    #[inline]
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(local: &str) -> Term {
        NamedNode::new_unchecked(format!("http://example.com/{local}")).into()
    }

    #[test]
    fn concreteness() {
        assert!(ex("a").is_concrete());
        assert!(Term::from(BlankNode::new_unchecked("b")).is_concrete());
        assert!(Term::from(Literal::new_simple_literal("c")).is_concrete());
        assert!(!Term::from(Variable::any()).is_concrete());
        assert!(Term::from(Variable::new_unchecked("x")).is_variable());
    }

    #[test]
    fn concrete_terms_match_by_equality() {
        assert_eq!(ex("a").matches(&ex("a")), Ok(true));
        assert_eq!(ex("a").matches(&ex("b")), Ok(false));
        assert_eq!(
            ex("a").matches(&Term::from(Variable::new_unchecked("x"))),
            Ok(false)
        );
    }

    #[test]
    fn variables_match_concrete_terms() {
        let var = Term::from(Variable::new_unchecked("x"));
        assert_eq!(var.matches(&ex("a")), Ok(true));
        assert_eq!(
            Term::from(Variable::any()).matches(&Term::from(Literal::new_simple_literal("1"))),
            Ok(true)
        );
    }

    #[test]
    fn matching_two_variables_fails() {
        let x = Term::from(Variable::new_unchecked("x"));
        assert_eq!(x.matches(&x), Err(PatternMatchError::default()));
    }

    #[test]
    fn variable_equality_uses_names() {
        assert_eq!(Variable::new_unchecked("x"), Variable::new_unchecked("x"));
        assert_ne!(Variable::new_unchecked("x"), Variable::new_unchecked("y"));
        assert_eq!(Variable::any(), Variable::any());
        assert_ne!(Variable::any(), Variable::new_unchecked("x"));
    }
}
