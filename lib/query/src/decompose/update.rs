use super::push_unique;
use crate::classify::normalize;
use crate::extract::{
    compile, extract_filters, extract_patterns, extract_variables, TermResolver, IRI, PNAME,
};
use crate::{QueryError, QueryParts, UpdateSubType};
use regex::Regex;
use std::sync::LazyLock;

static INSERT_DATA: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)^INSERT\s+DATA\s*\{(.*)\}\s*;?\s*$"));

static INSERT_INTO: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?is)^INSERT\s+INTO\s+(?:GRAPH\s+)?({IRI}|{PNAME})\s*\{{(.*)\}}\s*;?\s*$"
    ))
});

static DELETE_DATA: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)^DELETE\s+DATA\s*\{(.*)\}\s*;?\s*$"));

static DELETE_WHERE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)^DELETE\s+WHERE\s*\{(.*)\}\s*;?\s*$"));

static DELETE_FROM_WHERE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?is)^DELETE\s+FROM\s+(?:GRAPH\s+)?({IRI}|{PNAME})\s*\{{(.*?)\}}\s*WHERE\s*\{{(.*)\}}\s*;?\s*$"
    ))
});

static DELETE_PROLOG_WHERE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?is)^DELETE\s*\{(.*?)\}\s*(?:INSERT\s*\{(.*?)\}\s*)?WHERE\s*\{(.*)\}\s*;?\s*$")
});

static WITH_DELETE_WHERE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?is)^WITH\s+({IRI}|{PNAME})\s+DELETE\s*\{{(.*?)\}}\s*(?:INSERT\s*\{{(.*?)\}}\s*)?WHERE\s*\{{(.*)\}}\s*;?\s*$"
    ))
});

static WITH_INSERT: LazyLock<Regex> = LazyLock::new(|| compile(r"\}\s*insert\s*\{"));

/// Decomposes the `INSERT` and `DELETE` update forms.
///
/// For forms with templates, the triple and quad patterns are those of the `DELETE` template
/// followed by those of the `INSERT` template. The `WHERE` clause is kept as text and only
/// contributes its filters.
pub(super) fn decompose(body: &str, resolver: &TermResolver<'_>) -> Result<QueryParts, QueryError> {
    let sub_type = sub_type(body)?;
    let (regex, shape) = match sub_type {
        UpdateSubType::InsertData => (&INSERT_DATA, "INSERT DATA { … }"),
        UpdateSubType::InsertInto => (&INSERT_INTO, "INSERT INTO <graph> { … }"),
        UpdateSubType::DeleteData => (&DELETE_DATA, "DELETE DATA { … }"),
        UpdateSubType::DeleteWhere => (&DELETE_WHERE, "DELETE WHERE { … }"),
        UpdateSubType::DeleteFromWhere => (
            &DELETE_FROM_WHERE,
            "DELETE FROM <graph> { … } WHERE { … }",
        ),
        UpdateSubType::DeletePrologWhere => {
            (&DELETE_PROLOG_WHERE, "DELETE { … } [INSERT { … }] WHERE { … }")
        }
        _ => (
            &WITH_DELETE_WHERE,
            "WITH <graph> DELETE { … } [INSERT { … }] WHERE { … }",
        ),
    };
    let captures = regex.captures(body).ok_or_else(|| QueryError::MalformedUpdate {
        sub_type,
        reason: format!("expected {shape}"),
    })?;

    let group = |index: usize| captures.get(index).map(|m| m.as_str());
    let mut graphs = Vec::new();
    let (templates, where_clause) = match sub_type {
        UpdateSubType::InsertData | UpdateSubType::DeleteData | UpdateSubType::DeleteWhere => {
            (vec![group(1)], group(1))
        }
        UpdateSubType::InsertInto => {
            graphs.push(resolver.iri(&captures[1]));
            (vec![group(2)], None)
        }
        UpdateSubType::DeleteFromWhere => {
            graphs.push(resolver.iri(&captures[1]));
            (vec![group(2)], group(3))
        }
        UpdateSubType::DeletePrologWhere => (vec![group(1), group(2)], group(3)),
        _ => {
            graphs.push(resolver.iri(&captures[1]));
            (vec![group(2), group(3)], group(4))
        }
    };

    let mut parts = patterns(&templates, resolver);
    for quad in &parts.quad_pattern {
        if quad.graph.is_uri() {
            push_unique(&mut graphs, quad.graph.value.clone());
        }
    }
    parts.sub_type = Some(sub_type);
    parts.graphs = graphs;
    parts.where_clause = where_clause.map(str::to_owned);
    parts.filter_pattern = where_clause
        .map(|clause| extract_filters(clause, resolver))
        .unwrap_or_default();
    parts.variables = extract_variables(body);
    Ok(parts)
}

fn patterns(templates: &[Option<&str>], resolver: &TermResolver<'_>) -> QueryParts {
    let mut parts = QueryParts::default();
    for template in templates.iter().flatten() {
        let (triples, quads) = extract_patterns(template, resolver);
        parts.triple_pattern.extend(triples);
        parts.quad_pattern.extend(quads);
    }
    parts
}

/// Determines the sub type by the leading keywords.
fn sub_type(body: &str) -> Result<UpdateSubType, QueryError> {
    let normalized = normalize(body);
    let starts_with = |prefix: &str| normalized.starts_with(prefix);

    Ok(if starts_with("insert data") {
        UpdateSubType::InsertData
    } else if starts_with("insert into") {
        UpdateSubType::InsertInto
    } else if starts_with("insert") {
        return Err(QueryError::UnsupportedQueryForm(body.to_owned()));
    } else if starts_with("delete data") {
        UpdateSubType::DeleteData
    } else if starts_with("delete where") {
        UpdateSubType::DeleteWhere
    } else if starts_with("delete from") {
        UpdateSubType::DeleteFromWhere
    } else if starts_with("delete") {
        UpdateSubType::DeletePrologWhere
    } else if starts_with("with") && WITH_INSERT.is_match(&normalized) {
        UpdateSubType::WithDeleteInsertWhere
    } else if starts_with("with") {
        UpdateSubType::WithDeleteWhere
    } else {
        return Err(QueryError::UnsupportedQueryForm(body.to_owned()));
    })
}

