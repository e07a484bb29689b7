use crate::classify::QueryShape;
use crate::extract::{where_clause, TermResolver};
use crate::{QueryError, QueryParts};

pub(super) fn decompose(body: &str, resolver: &TermResolver<'_>) -> Result<QueryParts, QueryError> {
    let clause = where_clause(body).ok_or(QueryError::MissingClause {
        clause: "WHERE",
        shape: QueryShape::Ask.as_str(),
    })?;
    Ok(super::read_parts(body, Some(clause), resolver))
}
