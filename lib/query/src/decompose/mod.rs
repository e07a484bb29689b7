mod ask;
mod describe;
mod graph;
mod select;
mod update;

use crate::classify::QueryShape;
use crate::extract::{
    before_where_clause, extract_dataset, extract_filters, extract_patterns, extract_prefixes,
    extract_variables, strip_prologue, TermResolver,
};
use crate::{QueryError, QueryParts};
use rdf_memo_model::Namespaces;

/// Extracts the parts of `query`, which has already been classified as `shape`.
pub(crate) fn decompose(
    query: &str,
    shape: QueryShape,
    namespaces: &Namespaces,
) -> Result<QueryParts, QueryError> {
    let prefixes = extract_prefixes(query);
    let body = strip_prologue(query);
    let resolver = TermResolver::new(&prefixes, namespaces);

    let parts = match shape {
        QueryShape::Ask => ask::decompose(&body, &resolver)?,
        QueryShape::Describe => describe::decompose(&body, &resolver),
        QueryShape::Select => select::decompose(&body, &resolver)?,
        QueryShape::Update => update::decompose(&body, &resolver)?,
        QueryShape::Graph => graph::decompose(&body, &resolver)?,
    };

    Ok(QueryParts { prefixes, ..parts })
}

/// The parts shared by all read-only shapes.
fn read_parts(body: &str, clause: Option<&str>, resolver: &TermResolver<'_>) -> QueryParts {
    let (graphs, named_graphs) = extract_dataset(before_where_clause(body), resolver);
    let (triple_pattern, quad_pattern, filter_pattern) = match clause {
        Some(clause) => {
            let (triples, quads) = extract_patterns(clause, resolver);
            (triples, quads, extract_filters(clause, resolver))
        }
        None => Default::default(),
    };

    QueryParts {
        graphs,
        named_graphs,
        where_clause: clause.map(str::to_owned),
        triple_pattern,
        quad_pattern,
        filter_pattern,
        variables: extract_variables(body),
        ..QueryParts::default()
    }
}

fn push_unique(target: &mut Vec<String>, value: String) {
    if !target.contains(&value) {
        target.push(value);
    }
}
