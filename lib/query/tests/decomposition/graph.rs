use crate::strings;
use rdf_memo_query::{Query, QueryError, QueryShape, UpdateSubType};
use std::error::Error;

#[test]
fn test_graph_management_sub_types() -> Result<(), Box<dyn Error>> {
    let table = [
        ("DROP SILENT GRAPH <http://g/>", UpdateSubType::DropSilentGraph),
        ("DROP GRAPH <http://g/>", UpdateSubType::DropGraph),
        ("CREATE GRAPH <http://g/>", UpdateSubType::CreateGraph),
        ("CREATE SILENT GRAPH <http://g/>", UpdateSubType::CreateSilentGraph),
        ("CLEAR GRAPH <http://g/>", UpdateSubType::ClearGraph),
        ("clear silent graph <http://g/> ;", UpdateSubType::ClearGraph),
    ];
    for (text, sub_type) in table {
        let query = Query::new(text)?;
        assert_eq!(query.shape(), QueryShape::Graph, "{text}");
        assert_eq!(query.parts()?.sub_type, Some(sub_type), "{text}");
        assert_eq!(query.parts()?.graphs, strings(&["http://g/"]), "{text}");
    }
    Ok(())
}

#[test]
fn test_prefixed_graph_name() -> Result<(), Box<dyn Error>> {
    let query = Query::new("PREFIX ex: <http://example.com/>\nCREATE GRAPH ex:g")?;
    assert_eq!(query.parts()?.graphs, strings(&["http://example.com/g"]));
    Ok(())
}

#[test]
fn test_other_targets_are_unsupported() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        Query::new("CLEAR ALL")?.parts().unwrap_err(),
        QueryError::UnsupportedQueryForm("CLEAR ALL".to_owned())
    );
    assert_eq!(
        Query::new("DROP SILENT DEFAULT")?.parts().unwrap_err(),
        QueryError::UnsupportedQueryForm("DROP SILENT DEFAULT".to_owned())
    );
    Ok(())
}

#[test]
fn test_missing_graph_keyword() -> Result<(), Box<dyn Error>> {
    let error = Query::new("CREATE <http://g/>")?.parts().unwrap_err();
    insta::assert_snapshot!(error, @"Malformed createGraph update: expected a single GRAPH <uri> target");
    Ok(())
}
