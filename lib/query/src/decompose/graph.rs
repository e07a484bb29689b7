use crate::extract::{compile, TermResolver, IRI, PNAME};
use crate::{QueryError, QueryParts, UpdateSubType};
use regex::Regex;
use std::sync::LazyLock;

static OPERATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)^(CLEAR|CREATE|DROP)(\s+SILENT)?\b"));

static GRAPH_OPERATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?is)^(?:CLEAR|CREATE|DROP)(?:\s+SILENT)?\s+GRAPH\s+({IRI}|{PNAME})\s*;?\s*$"
    ))
});

static OTHER_TARGET: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)^(?:CLEAR|DROP)(?:\s+SILENT)?\s+(?:DEFAULT|NAMED|ALL)\b"));

/// Decomposes `CLEAR`, `CREATE` and `DROP` operations on a single graph.
///
/// `CLEAR SILENT GRAPH` is treated as `CLEAR GRAPH`. Operations on the default graph, all named
/// graphs or all graphs are not supported.
pub(super) fn decompose(body: &str, resolver: &TermResolver<'_>) -> Result<QueryParts, QueryError> {
    let captures = OPERATION
        .captures(body)
        .ok_or_else(|| QueryError::UnknownQueryType(body.to_owned()))?;
    let silent = captures.get(2).is_some();
    let sub_type = match captures[1].to_ascii_uppercase().as_str() {
        "CLEAR" => UpdateSubType::ClearGraph,
        "CREATE" if silent => UpdateSubType::CreateSilentGraph,
        "CREATE" => UpdateSubType::CreateGraph,
        _ if silent => UpdateSubType::DropSilentGraph,
        _ => UpdateSubType::DropGraph,
    };

    if OTHER_TARGET.is_match(body) {
        return Err(QueryError::UnsupportedQueryForm(body.to_owned()));
    }
    let graph = GRAPH_OPERATION
        .captures(body)
        .ok_or_else(|| QueryError::MalformedUpdate {
            sub_type,
            reason: "expected a single GRAPH <uri> target".to_owned(),
        })?;

    Ok(QueryParts {
        sub_type: Some(sub_type),
        graphs: vec![resolver.iri(&graph[1])],
        ..QueryParts::default()
    })
}
