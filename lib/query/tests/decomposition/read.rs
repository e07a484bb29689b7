use crate::{strings, uri, var};
use rdf_memo_model::Namespaces;
use rdf_memo_query::{
    FilterOperator, FilterPattern, OrderCondition, OrderDirection, PatternTerm, PatternTermKind,
    Query, QueryError, QueryFactory, QueryShape, TriplePatternPart,
};
use std::error::Error;

const PERSONS: &str = r#"PREFIX ex: <http://example.com/>
SELECT DISTINCT ?name ?age FROM <http://example.com/g1> FROM NAMED <http://example.com/g2>
WHERE {
  ?person a foaf:Person .
  ?person foaf:name ?name .
  ?person ex:age ?age .
  FILTER (?age >= 18)
}
ORDER BY DESC(?age) ?name
LIMIT 10 OFFSET 5"#;

#[test]
fn test_select_parts() -> Result<(), Box<dyn Error>> {
    let query = Query::new(PERSONS)?;
    assert_eq!(query.shape(), QueryShape::Select);

    let parts = query.parts()?;
    assert_eq!(
        parts.prefixes.get("ex").map(String::as_str),
        Some("http://example.com/")
    );
    assert_eq!(parts.graphs, strings(&["http://example.com/g1"]));
    assert_eq!(parts.named_graphs, strings(&["http://example.com/g2"]));
    assert_eq!(
        parts.triple_pattern,
        vec![
            TriplePatternPart {
                subject: var("person"),
                predicate: uri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
                object: uri("http://xmlns.com/foaf/0.1/Person"),
            },
            TriplePatternPart {
                subject: var("person"),
                predicate: uri("http://xmlns.com/foaf/0.1/name"),
                object: var("name"),
            },
            TriplePatternPart {
                subject: var("person"),
                predicate: uri("http://example.com/age"),
                object: var("age"),
            },
        ]
    );
    assert!(parts.quad_pattern.is_empty());
    assert_eq!(
        parts.filter_pattern,
        vec![FilterPattern::Relational {
            variable: "age".to_owned(),
            operator: FilterOperator::GreaterOrEqual,
            operand: PatternTerm {
                datatype: Some("http://www.w3.org/2001/XMLSchema#integer".to_owned()),
                ..PatternTerm::new("18", PatternTermKind::TypedLiteral)
            },
        }]
    );
    assert_eq!(parts.variables, strings(&["name", "age", "person"]));
    assert_eq!(parts.result_variables, strings(&["name", "age"]));
    assert!(parts.modifiers.distinct);
    assert_eq!(
        parts.modifiers.order_by,
        vec![
            OrderCondition {
                variable: "age".to_owned(),
                direction: OrderDirection::Descending,
            },
            OrderCondition {
                variable: "name".to_owned(),
                direction: OrderDirection::Ascending,
            },
        ]
    );
    assert_eq!(parts.modifiers.limit, Some(10));
    assert_eq!(parts.modifiers.offset, Some(5));
    assert_eq!(
        parts.referenced_graphs(),
        strings(&["http://example.com/g1", "http://example.com/g2"])
    );
    Ok(())
}

#[test]
fn test_select_star_projects_where_variables() -> Result<(), Box<dyn Error>> {
    let query = Query::new("SELECT * WHERE { ?s <http://p/> ?o }")?;
    assert_eq!(query.parts()?.result_variables, strings(&["s", "o"]));
    Ok(())
}

#[test]
fn test_ask_with_quad_block() -> Result<(), Box<dyn Error>> {
    let query = Query::new(r#"ASK { GRAPH <http://g/> { ?s ?p "x"@en } }"#)?;
    let parts = query.parts()?;

    assert!(parts.triple_pattern.is_empty());
    assert_eq!(parts.quad_pattern.len(), 1);
    assert_eq!(parts.quad_pattern[0].graph, uri("http://g/"));
    assert_eq!(parts.quad_pattern[0].object.language.as_deref(), Some("en"));
    assert_eq!(parts.referenced_graphs(), strings(&["http://g/"]));
    Ok(())
}

#[test]
fn test_variable_graph_block_is_not_referenced() -> Result<(), Box<dyn Error>> {
    let query = Query::new("SELECT ?g WHERE { GRAPH ?g { ?s ?p ?o } }")?;
    let parts = query.parts()?;

    assert_eq!(parts.quad_pattern[0].graph, var("g"));
    assert!(parts.referenced_graphs().is_empty());
    Ok(())
}

#[test]
fn test_missing_where_clause() -> Result<(), Box<dyn Error>> {
    let error = Query::new("ASK")?.parts().unwrap_err();
    insta::assert_snapshot!(error, @"Missing WHERE clause in askQuery");

    let error = Query::new("SELECT ?s")?.parts().unwrap_err();
    insta::assert_snapshot!(error, @"Missing WHERE clause in selectQuery");
    Ok(())
}

#[test]
fn test_describe_without_where_clause() -> Result<(), Box<dyn Error>> {
    let query = Query::new("DESCRIBE <http://example.com/s>")?;
    let parts = query.parts()?;

    assert_eq!(query.shape(), QueryShape::Describe);
    assert_eq!(parts.where_clause, None);
    assert!(parts.triple_pattern.is_empty());
    assert!(parts.result_variables.is_empty());
    Ok(())
}

#[test]
fn test_describe_with_where_clause() -> Result<(), Box<dyn Error>> {
    let query = Query::new("DESCRIBE ?s FROM <http://g/> WHERE { ?s <http://p/> ?o }")?;
    let parts = query.parts()?;

    assert_eq!(parts.result_variables, strings(&["s"]));
    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert_eq!(parts.triple_pattern.len(), 1);
    Ok(())
}

#[test]
fn test_factory_namespaces() -> Result<(), Box<dyn Error>> {
    let factory = QueryFactory::new(Namespaces::empty().with_prefix("ex", "http://example.com/"));

    let query = factory.create("SELECT ?s WHERE { ?s ex:p ?o }")?;
    assert_eq!(
        query.parts()?.triple_pattern[0].predicate,
        uri("http://example.com/p")
    );

    let query = factory.create("PREFIX ex: <http://other.com/> SELECT ?s WHERE { ?s ex:p ?o }")?;
    assert_eq!(
        query.parts()?.triple_pattern[0].predicate,
        uri("http://other.com/p")
    );

    let query = factory.create("SELECT ?s WHERE { ?s foaf:name ?o }")?;
    assert_eq!(query.parts()?.triple_pattern[0].predicate, uri("foaf:name"));
    Ok(())
}

#[test]
fn test_decomposition_is_stable() -> Result<(), Box<dyn Error>> {
    let texts = [
        PERSONS,
        "ASK { ?s ?p ?o }",
        "INSERT DATA { GRAPH <http://g/> { <http://s/> <http://p/> \"v\" } }",
        "WITH <http://g/> DELETE { ?s ?p ?o } WHERE { ?s ?p ?o }",
        "DROP SILENT GRAPH <http://g/>",
    ];
    for text in texts {
        let query = Query::new(text)?;
        let first = query.parts()?;
        assert!(std::ptr::eq(first, query.parts()?));

        let again = Query::new(query.text())?;
        assert_eq!(again.parts()?, first, "{text}");
    }
    Ok(())
}

#[test]
fn test_unknown_query_type() {
    assert_eq!(
        Query::new("LOAD <http://example.com/data.ttl>").unwrap_err(),
        QueryError::UnknownQueryType("LOAD <http://example.com/data.ttl>".to_owned())
    );
}
