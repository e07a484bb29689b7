use rdf_memo_model::{Statement, Term};
use std::vec;

/// The result of a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResult {
    /// The result of updates and graph management queries.
    Empty,
    /// The result of `ASK` queries.
    Boolean(bool),
    /// The result of `SELECT` queries.
    Solutions(QuerySolutions),
    /// The result of `DESCRIBE` and `CONSTRUCT` queries.
    Statements(Vec<Statement>),
}

impl QueryResult {
    /// A short name of the result kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "an empty result",
            Self::Boolean(_) => "a boolean",
            Self::Solutions(_) => "solutions",
            Self::Statements(_) => "statements",
        }
    }
}

/// A table of variable bindings.
///
/// Each row has one (possibly unbound) entry per variable, in the order of
/// [QuerySolutions::variables].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySolutions {
    variables: Vec<String>,
    solutions: Vec<Vec<Option<Term>>>,
}

impl QuerySolutions {
    pub fn new(variables: Vec<String>, solutions: Vec<Vec<Option<Term>>>) -> Self {
        Self {
            variables,
            solutions,
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Option<Term>]> {
        self.solutions.iter().map(Vec::as_slice)
    }

    /// Returns the binding of `variable` in the solution at `index`.
    pub fn get(&self, index: usize, variable: &str) -> Option<&Term> {
        let position = self.variables.iter().position(|v| v == variable)?;
        self.solutions.get(index)?.get(position)?.as_ref()
    }
}

/// An iterator over the statements returned by
/// [Store::get_matching_statements](crate::Store::get_matching_statements).
#[derive(Debug)]
pub struct StatementIterator {
    inner: vec::IntoIter<Statement>,
}

impl StatementIterator {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            inner: statements.into_iter(),
        }
    }
}

impl Iterator for StatementIterator {
    type Item = Statement;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for StatementIterator {}
