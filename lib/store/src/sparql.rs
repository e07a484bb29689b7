//! Builders for the query text sent by the statement operations of a [Store](crate::Store).
//!
//! Variables of a statement pattern are independent of each other. Hence, the builders name them
//! by their position (`?s`, `?p`, `?o`, `?g`) instead of using the names given in the pattern.

use itertools::Itertools;
use rdf_memo_model::{NamedNode, Statement, Term};

const POSITIONS: [&str; 3] = ["s", "p", "o"];

fn components(statement: &Statement) -> [&Term; 3] {
    [&statement.subject, &statement.predicate, &statement.object]
}

/// Renders the triple of `statement`, ignoring its graph.
fn triple(statement: &Statement) -> String {
    format!(
        "{} {} {} .",
        statement.subject, statement.predicate, statement.object
    )
}

/// Renders the triple of `pattern` with positional variable names.
fn triple_pattern(pattern: &Statement) -> String {
    let parts = components(pattern)
        .into_iter()
        .zip(POSITIONS)
        .map(|(term, position)| {
            if term.is_variable() {
                format!("?{position}")
            } else {
                term.to_string()
            }
        })
        .join(" ");
    format!("{parts} .")
}

/// Renders one `FILTER` per concrete component of `pattern`.
fn filters(pattern: &Statement) -> String {
    components(pattern)
        .into_iter()
        .zip(POSITIONS)
        .filter(|(term, _)| term.is_concrete())
        .map(|(term, position)| format!(" FILTER (?{position} = {term})"))
        .join("")
}

/// `INSERT DATA { GRAPH <graph> { … } }`
pub fn insert_data(graph: &NamedNode, statements: &[Statement]) -> String {
    format!(
        "INSERT DATA {{ GRAPH {graph} {{ {} }} }}",
        statements.iter().map(triple).join(" ")
    )
}

/// `DELETE WHERE { GRAPH <graph> { … } }`
pub fn delete_where(graph: &NamedNode, pattern: &Statement) -> String {
    format!(
        "DELETE WHERE {{ GRAPH {graph} {{ {} }} }}",
        triple_pattern(pattern)
    )
}

/// A `SELECT` query returning the subject, predicate and object (and, without a `graph`, the
/// graph) of every statement matched by `pattern`.
pub fn select_matching(pattern: &Statement, graph: Option<&NamedNode>) -> String {
    let filters = filters(pattern);
    match graph {
        Some(graph) => {
            format!("SELECT ?s ?p ?o FROM {graph} WHERE {{ ?s ?p ?o .{filters} }}")
        }
        None => format!("SELECT ?s ?p ?o ?g WHERE {{ GRAPH ?g {{ ?s ?p ?o . }}{filters} }}"),
    }
}

/// An `ASK` query checking whether `pattern` matches any statement.
pub fn ask_matching(pattern: &Statement, graph: Option<&NamedNode>) -> String {
    let pattern = triple_pattern(pattern);
    match graph {
        Some(graph) => format!("ASK FROM {graph} {{ {pattern} }}"),
        None => format!("ASK {{ GRAPH ?g {{ {pattern} }} }}"),
    }
}

/// The query that describes `subject` within `graph`.
pub fn subject_resource(graph: &NamedNode, subject: &Term) -> String {
    format!("SELECT ?p ?o FROM {graph} WHERE {{{subject} ?p ?o.}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_memo_model::{Literal, Variable};

    fn graph() -> NamedNode {
        NamedNode::new_unchecked("http://example.com/g")
    }

    fn pattern() -> Statement {
        Statement::new_triple(
            NamedNode::new_unchecked("http://example.com/s"),
            Variable::new_unchecked("predicate"),
            Variable::any(),
        )
    }

    #[test]
    fn test_insert_data() {
        let statements = [
            Statement::new_triple(
                NamedNode::new_unchecked("http://example.com/s"),
                NamedNode::new_unchecked("http://example.com/p"),
                NamedNode::new_unchecked("http://example.com/o"),
            ),
            Statement::new_triple(
                NamedNode::new_unchecked("http://example.com/s"),
                NamedNode::new_unchecked("http://example.com/p"),
                Literal::new_language_tagged_literal("a \"quoted\"\nvalue", "en").unwrap(),
            ),
        ];
        insta::assert_snapshot!(insert_data(&graph(), &statements), @r#"INSERT DATA { GRAPH <http://example.com/g> { <http://example.com/s> <http://example.com/p> <http://example.com/o> . <http://example.com/s> <http://example.com/p> "a \"quoted\"\nvalue"@en . } }"#);
    }

    #[test]
    fn test_delete_where() {
        insta::assert_snapshot!(delete_where(&graph(), &pattern()), @"DELETE WHERE { GRAPH <http://example.com/g> { <http://example.com/s> ?p ?o . } }");
    }

    #[test]
    fn test_select_matching() {
        insta::assert_snapshot!(select_matching(&pattern(), Some(&graph())), @"SELECT ?s ?p ?o FROM <http://example.com/g> WHERE { ?s ?p ?o . FILTER (?s = <http://example.com/s>) }");
        insta::assert_snapshot!(select_matching(&pattern(), None), @"SELECT ?s ?p ?o ?g WHERE { GRAPH ?g { ?s ?p ?o . } FILTER (?s = <http://example.com/s>) }");
    }

    #[test]
    fn test_ask_matching() {
        insta::assert_snapshot!(ask_matching(&pattern(), Some(&graph())), @"ASK FROM <http://example.com/g> { <http://example.com/s> ?p ?o . }");
        insta::assert_snapshot!(ask_matching(&pattern(), None), @"ASK { GRAPH ?g { <http://example.com/s> ?p ?o . } }");
    }

    #[test]
    fn test_subject_resource() {
        insta::assert_snapshot!(
            subject_resource(&graph(), &NamedNode::new_unchecked("http://example.com/s").into()),
            @"SELECT ?p ?o FROM <http://example.com/g> WHERE {<http://example.com/s> ?p ?o.}"
        );
    }
}
