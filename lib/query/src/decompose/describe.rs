use crate::extract::{before_where_clause, extract_variables, where_clause, TermResolver};
use crate::QueryParts;

/// `DESCRIBE` may omit the `WHERE` clause, e.g., `DESCRIBE <http://example.com/s>`.
pub(super) fn decompose(body: &str, resolver: &TermResolver<'_>) -> QueryParts {
    let clause = where_clause(body);
    let mut parts = super::read_parts(body, clause, resolver);
    parts.result_variables = extract_variables(before_where_clause(body));
    parts
}
