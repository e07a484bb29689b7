use crate::{strings, uri, var};
use rdf_memo_query::{PatternTerm, PatternTermKind, Query, QueryError, QueryShape, UpdateSubType};
use std::error::Error;

#[test]
fn test_insert_data_with_graph() -> Result<(), Box<dyn Error>> {
    let query = Query::new(
        r#"INSERT DATA { GRAPH <http://g/> { <http://s/> <http://p/> <http://o/> . <http://s/> <http://p/> "v" } }"#,
    )?;
    let parts = query.parts()?;

    assert_eq!(query.shape(), QueryShape::Update);
    assert_eq!(parts.sub_type, Some(UpdateSubType::InsertData));
    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert!(parts.triple_pattern.is_empty());
    assert_eq!(parts.quad_pattern.len(), 2);
    assert_eq!(parts.quad_pattern[0].object, uri("http://o/"));
    assert_eq!(
        parts.quad_pattern[1].object,
        PatternTerm::new("v", PatternTermKind::Literal)
    );
    Ok(())
}

#[test]
fn test_braces_in_literals_stay_in_graph_block() -> Result<(), Box<dyn Error>> {
    let query = Query::new(
        r#"INSERT DATA { GRAPH <http://g/> { <http://s/> <http://p/> "a}b" . <http://s/> <http://p/> "{c" } }"#,
    )?;
    let parts = query.parts()?;

    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert!(parts.triple_pattern.is_empty());
    assert_eq!(
        parts
            .quad_pattern
            .iter()
            .map(|quad| quad.object.value.as_str())
            .collect::<Vec<_>>(),
        ["a}b", "{c"]
    );
    Ok(())
}

#[test]
fn test_insert_data_without_graph() -> Result<(), Box<dyn Error>> {
    let query = Query::new("INSERT DATA { <http://s/> <http://p/> <http://o/> }")?;
    let parts = query.parts()?;

    assert_eq!(parts.sub_type, Some(UpdateSubType::InsertData));
    assert!(parts.graphs.is_empty());
    assert_eq!(parts.triple_pattern.len(), 1);
    Ok(())
}

#[test]
fn test_insert_into() -> Result<(), Box<dyn Error>> {
    let query = Query::new("INSERT INTO GRAPH <http://g/> { <http://s/> <http://p/> 42 }")?;
    let parts = query.parts()?;

    assert_eq!(parts.sub_type, Some(UpdateSubType::InsertInto));
    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert_eq!(
        parts.triple_pattern[0].object.datatype.as_deref(),
        Some("http://www.w3.org/2001/XMLSchema#integer")
    );
    Ok(())
}

#[test]
fn test_delete_where() -> Result<(), Box<dyn Error>> {
    let query = Query::new("DELETE WHERE { GRAPH <http://g/> { ?s ?p ?o } }")?;
    let parts = query.parts()?;

    assert_eq!(parts.sub_type, Some(UpdateSubType::DeleteWhere));
    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert_eq!(parts.quad_pattern.len(), 1);
    assert_eq!(parts.quad_pattern[0].subject, var("s"));
    assert_eq!(parts.variables, strings(&["s", "p", "o"]));
    Ok(())
}

#[test]
fn test_delete_from_where() -> Result<(), Box<dyn Error>> {
    let query = Query::new(
        r#"DELETE FROM <http://g/> { ?s <http://p/> ?o } WHERE { ?s <http://p/> ?o . FILTER (?o = "x") }"#,
    )?;
    let parts = query.parts()?;

    assert_eq!(parts.sub_type, Some(UpdateSubType::DeleteFromWhere));
    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert_eq!(parts.triple_pattern.len(), 1);
    assert_eq!(parts.filter_pattern.len(), 1);
    Ok(())
}

#[test]
fn test_delete_insert_where() -> Result<(), Box<dyn Error>> {
    let query = Query::new(
        "DELETE { ?s <http://p/> ?o } INSERT { ?s <http://q/> ?o } WHERE { ?s <http://p/> ?o }",
    )?;
    let parts = query.parts()?;

    assert_eq!(parts.sub_type, Some(UpdateSubType::DeletePrologWhere));
    let predicates = parts
        .triple_pattern
        .iter()
        .map(|triple| triple.predicate.value.as_str())
        .collect::<Vec<_>>();
    assert_eq!(predicates, vec!["http://p/", "http://q/"]);
    assert_eq!(parts.where_clause.as_deref(), Some(" ?s <http://p/> ?o "));
    Ok(())
}

#[test]
fn test_with_delete_insert_where() -> Result<(), Box<dyn Error>> {
    let query = Query::new(
        r#"WITH <http://g/> DELETE { ?s ?p ?o } INSERT { ?s ?p "new" } WHERE { ?s ?p ?o }"#,
    )?;
    let parts = query.parts()?;

    assert_eq!(parts.sub_type, Some(UpdateSubType::WithDeleteInsertWhere));
    assert_eq!(parts.graphs, strings(&["http://g/"]));
    assert_eq!(parts.triple_pattern.len(), 2);

    let query = Query::new("WITH <http://g/> DELETE { ?s ?p ?o } WHERE { ?s ?p ?o }")?;
    assert_eq!(query.sub_type()?, Some(UpdateSubType::WithDeleteWhere));
    Ok(())
}

#[test]
fn test_malformed_update() -> Result<(), Box<dyn Error>> {
    let error = Query::new("INSERT DATA <http://s/> <http://p/> <http://o/>")?
        .parts()
        .unwrap_err();
    insta::assert_snapshot!(error, @"Malformed insertData update: expected INSERT DATA { … }");

    let error = Query::new("DELETE DATA")?.parts().unwrap_err();
    insta::assert_snapshot!(error, @"Malformed deleteData update: expected DELETE DATA { … }");
    Ok(())
}

#[test]
fn test_insert_where_is_unsupported() -> Result<(), Box<dyn Error>> {
    let text = "INSERT { ?s <http://q/> ?o } WHERE { ?s <http://p/> ?o }";
    assert_eq!(
        Query::new(text)?.parts().unwrap_err(),
        QueryError::UnsupportedQueryForm(text.to_owned())
    );
    Ok(())
}
