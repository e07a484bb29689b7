use crate::{NamedNode, PatternMatchError, Term};
use std::fmt;

/// A [triple](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-triple) or a quad, i.e., a triple
/// within a named graph.
///
/// A statement with at least one variable is a *pattern* and is used for matching other
/// statements.
///
/// The default string formatter is returning an N-Triples/N-Quads line:
/// ```
/// use rdf_memo_model::{NamedNode, Statement};
///
/// let ex = NamedNode::new("http://example.com")?;
/// assert_eq!(
///     "<http://example.com> <http://example.com> <http://example.com> <http://example.com> .",
///     Statement::new_quad(ex.clone(), ex.clone(), ex.clone(), ex).to_string()
/// );
/// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Option<Term>,
}

impl Statement {
    #[inline]
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
        graph: Option<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph,
        }
    }

    /// Builds a statement without a graph.
    #[inline]
    pub fn new_triple(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self::new(subject, predicate, object, None)
    }

    /// Builds a statement within a graph.
    #[inline]
    pub fn new_quad(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
        graph: impl Into<Term>,
    ) -> Self {
        Self::new(subject, predicate, object, Some(graph.into()))
    }

    #[inline]
    pub fn is_triple(&self) -> bool {
        self.graph.is_none()
    }

    #[inline]
    pub fn is_quad(&self) -> bool {
        self.graph.is_some()
    }

    /// Returns whether none of the components (including the graph, if present) is a variable.
    pub fn is_concrete(&self) -> bool {
        self.subject.is_concrete()
            && self.predicate.is_concrete()
            && self.object.is_concrete()
            && self.graph.as_ref().is_none_or(Term::is_concrete)
    }

    #[inline]
    pub fn is_pattern(&self) -> bool {
        !self.is_concrete()
    }

    /// Returns the graph if it is a named node.
    pub fn graph_name(&self) -> Option<&NamedNode> {
        self.graph.as_ref().and_then(Term::as_named_node)
    }

    /// Returns a copy of this statement placed in `graph`.
    #[must_use]
    pub fn with_graph(&self, graph: Option<Term>) -> Self {
        Self {
            graph,
            ..self.clone()
        }
    }

    /// Checks whether this statement is matched by `pattern`.
    ///
    /// If the pattern has no graph, the graph of this statement is ignored.
    pub fn matches(&self, pattern: &Statement) -> Result<bool, PatternMatchError> {
        let graph_matches = match (&pattern.graph, &self.graph) {
            (None, _) => true,
            (Some(pattern_graph), Some(graph)) => pattern_graph.matches(graph)?,
            (Some(pattern_graph), None) => pattern_graph.is_variable(),
        };
        Ok(graph_matches
            && pattern.subject.matches(&self.subject)?
            && pattern.predicate.matches(&self.predicate)?
            && pattern.object.matches(&self.object)?)
    }
}

impl fmt::Display for Statement {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(graph) = &self.graph {
            write!(f, " {graph}")?;
        }
        f.write_str(" .")
    }
}
