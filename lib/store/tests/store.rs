#![cfg(test)]
#![allow(clippy::panic_in_result_fn, reason = "Tests")]

use oxrdfio::RdfFormat;
use rdf_memo_model::vocab::{rdf, xsd};
use rdf_memo_model::{Literal, NamedNode, Statement, Variable};
use rdf_memo_store::{MemoryStore, QueryResult, Store, StoreError};
use std::error::Error;

#[allow(clippy::non_ascii_literal, reason = "Test data")]
const DATA: &str = r#"
@prefix schema: <http://schema.org/> .
@prefix wd: <http://www.wikidata.org/entity/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

wd:Q90 a schema:City ;
    schema:name "Paris"@fr , "la ville lumière"@fr ;
    schema:country wd:Q142 ;
    schema:population 2000000 ;
    schema:startDate "-300"^^xsd:gYear ;
    schema:url "https://www.paris.fr/"^^xsd:anyURI ;
    schema:postalCode "75001" .
"#;
const NUMBER_OF_TRIPLES: usize = 8;

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{local}"))
}

fn any() -> Statement {
    Statement::new_triple(Variable::any(), Variable::any(), Variable::any())
}

fn sorted(statements: impl IntoIterator<Item = Statement>) -> Vec<Statement> {
    let mut statements = statements.into_iter().collect::<Vec<_>>();
    statements.sort();
    statements
}

#[test]
fn test_load_turtle() -> Result<(), Box<dyn Error>> {
    let graph = ex("paris");
    let mut store = MemoryStore::default();
    let count = store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes(), Some(&graph))?;
    assert_eq!(count, NUMBER_OF_TRIPLES);
    assert_eq!(store.len(), NUMBER_OF_TRIPLES);

    let paris = NamedNode::new("http://www.wikidata.org/entity/Q90")?;
    let statements = store.get_matching_statements(
        &Statement::new_triple(paris.clone(), Variable::any(), Variable::any()),
        Some(&graph),
    )?;
    assert_eq!(statements.len(), NUMBER_OF_TRIPLES);

    assert!(store.has_matching_statement(
        &Statement::new_triple(
            paris.clone(),
            NamedNode::new(rdf::TYPE)?,
            NamedNode::new("http://schema.org/City")?,
        ),
        Some(&graph),
    )?);
    assert!(store.has_matching_statement(
        &Statement::new_triple(
            paris.clone(),
            NamedNode::new("http://schema.org/name")?,
            Literal::new_language_tagged_literal("la ville lumière", "fr")?,
        ),
        Some(&graph),
    )?);
    assert!(store.has_matching_statement(
        &Statement::new_triple(
            paris,
            NamedNode::new("http://schema.org/population")?,
            Literal::new_typed_literal("2000000", NamedNode::new(xsd::INTEGER)?),
        ),
        Some(&graph),
    )?);
    Ok(())
}

#[test]
fn test_add_get_delete() -> Result<(), Box<dyn Error>> {
    let graph = ex("g");
    let statements = [
        Statement::new_quad(ex("s"), ex("p"), ex("o"), graph.clone()),
        Statement::new_quad(ex("s"), ex("label"), Literal::new_simple_literal("label"), graph.clone()),
    ];
    let mut store = MemoryStore::default();
    store.add_statements(&statements, Some(&graph))?;

    let found = store.get_matching_statements(&any(), Some(&graph))?;
    assert_eq!(sorted(found), sorted(statements.clone()));
    assert!(store.has_matching_statement(&any(), Some(&graph))?);

    store.delete_matching_statements(&any(), Some(&graph))?;
    assert_eq!(store.get_matching_statements(&any(), Some(&graph))?.len(), 0);
    assert!(!store.has_matching_statement(&any(), Some(&graph))?);
    Ok(())
}

#[test]
fn test_braces_in_literal_keep_graph() -> Result<(), Box<dyn Error>> {
    let graph = ex("g");
    let statement = Statement::new_quad(
        ex("s"),
        ex("p"),
        Literal::new_simple_literal("a}b"),
        graph.clone(),
    );
    let mut store = MemoryStore::default();
    store.add_statements(&[statement.clone()], Some(&graph))?;

    let found = store.get_matching_statements(&any(), Some(&graph))?.collect::<Vec<_>>();
    assert_eq!(found, vec![statement]);
    assert_eq!(store.len(), 1);
    Ok(())
}

#[test]
fn test_get_without_graph_returns_graphs() -> Result<(), Box<dyn Error>> {
    let statements = [
        Statement::new_quad(ex("s"), ex("p"), ex("o"), ex("g1")),
        Statement::new_quad(ex("s"), ex("p"), ex("o"), ex("g2")),
        Statement::new_quad(ex("t"), ex("p"), ex("o"), ex("g2")),
    ];
    let mut store = MemoryStore::default();
    store.add_statements(&statements, None)?;

    let pattern = Statement::new_triple(ex("s"), Variable::any(), Variable::any());
    let found = store.get_matching_statements(&pattern, None)?;
    assert_eq!(sorted(found), sorted(statements[..2].to_vec()));
    Ok(())
}

#[test]
fn test_delete_with_concrete_object() -> Result<(), Box<dyn Error>> {
    let graph = ex("g");
    let mut store = MemoryStore::default();
    store.add_statements(
        &[
            Statement::new_triple(ex("s"), ex("p"), Literal::new_simple_literal("keep")),
            Statement::new_triple(ex("s"), ex("p"), Literal::new_simple_literal("drop")),
        ],
        Some(&graph),
    )?;

    let pattern = Statement::new_triple(Variable::any(), ex("p"), Literal::new_simple_literal("drop"));
    store.delete_matching_statements(&pattern, Some(&graph))?;
    assert_eq!(store.len(), 1);
    assert!(!store.has_matching_statement(&pattern, Some(&graph))?);
    Ok(())
}

#[test]
fn test_escaped_literal_survives_query_text() -> Result<(), Box<dyn Error>> {
    let graph = ex("g");
    let statement = Statement::new_quad(
        ex("s"),
        ex("p"),
        Literal::new_simple_literal("a\\b \"c\"\nd\te\r"),
        graph.clone(),
    );
    let mut store = MemoryStore::default();
    store.add_statements(&[statement.clone()], None)?;

    let found = store.get_matching_statements(&statement, None)?.collect::<Vec<_>>();
    assert_eq!(found, vec![statement]);
    Ok(())
}

#[test]
fn test_delete_requires_graph() {
    let mut store = MemoryStore::default();
    assert!(matches!(
        store.delete_matching_statements(&any(), None),
        Err(StoreError::NoGraphSpecified(_))
    ));
}

#[test]
fn test_select_result_variables() -> Result<(), Box<dyn Error>> {
    let mut store = MemoryStore::default();
    store.add_statements(
        &[Statement::new_triple(ex("s"), ex("p"), ex("o"))],
        Some(&ex("g")),
    )?;

    let QueryResult::Solutions(solutions) =
        store.query("SELECT ?o ?s FROM <http://example.com/g> WHERE { ?s ?p ?o }")?
    else {
        return Err("expected solutions".into());
    };
    assert_eq!(solutions.variables(), ["o".to_owned(), "s".to_owned()]);
    assert_eq!(solutions.get(0, "s"), Some(&ex("s").into()));
    Ok(())
}
