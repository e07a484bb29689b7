use crate::classify::QueryShape;
use crate::extract::{after_where_clause, compile, extract_variables, where_clause, TermResolver};
use crate::{OrderCondition, OrderDirection, QueryError, QueryParts, SolutionModifiers};
use regex::Regex;
use std::sync::LazyLock;

static PROJECTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?is)^SELECT\s+(?:(DISTINCT|REDUCED)\s+)?(.*?)\s*(?:\bFROM\b|\bWHERE\b|\{)")
});

static ORDER_BY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)\bORDER\s+BY\s+(.*?)\s*(?:\bLIMIT\b|\bOFFSET\b|$)"));

static ORDER_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)(ASC|DESC)\s*\(\s*[?$]([A-Za-z0-9_]+)\s*\)|[?$]([A-Za-z0-9_]+)")
});

static LIMIT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bLIMIT\s+([0-9]+)"));

static OFFSET: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bOFFSET\s+([0-9]+)"));

pub(super) fn decompose(body: &str, resolver: &TermResolver<'_>) -> Result<QueryParts, QueryError> {
    let clause = where_clause(body).ok_or(QueryError::MissingClause {
        clause: "WHERE",
        shape: QueryShape::Select.as_str(),
    })?;
    let mut parts = super::read_parts(body, Some(clause), resolver);

    let mut modifiers = extract_modifiers(after_where_clause(body));
    if let Some(captures) = PROJECTION.captures(body) {
        match captures.get(1).map(|m| m.as_str().to_ascii_uppercase()) {
            Some(keyword) if keyword == "DISTINCT" => modifiers.distinct = true,
            Some(keyword) if keyword == "REDUCED" => modifiers.reduced = true,
            _ => {}
        }
        let projection = captures.get(2).map_or("", |m| m.as_str()).trim();
        parts.result_variables = if projection == "*" {
            extract_variables(clause)
        } else {
            extract_variables(projection)
        };
    }
    parts.modifiers = modifiers;

    Ok(parts)
}

/// Extracts `ORDER BY`, `LIMIT` and `OFFSET` from the text after the `WHERE` clause.
fn extract_modifiers(tail: &str) -> SolutionModifiers {
    let order_by = ORDER_BY
        .captures(tail)
        .map(|captures| {
            ORDER_CONDITION
                .captures_iter(&captures[1])
                .filter_map(|condition| {
                    if let Some(variable) = condition.get(3) {
                        return Some(OrderCondition {
                            variable: variable.as_str().to_owned(),
                            direction: OrderDirection::Ascending,
                        });
                    }
                    let direction = if condition.get(1)?.as_str().eq_ignore_ascii_case("DESC") {
                        OrderDirection::Descending
                    } else {
                        OrderDirection::Ascending
                    };
                    Some(OrderCondition {
                        variable: condition.get(2)?.as_str().to_owned(),
                        direction,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    SolutionModifiers {
        order_by,
        limit: number(&LIMIT, tail),
        offset: number(&OFFSET, tail),
        ..SolutionModifiers::default()
    }
}

fn number(regex: &Regex, text: &str) -> Option<u64> {
    regex.captures(text)?.get(1)?.as_str().parse().ok()
}
