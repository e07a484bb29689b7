use crate::extract::PREFIX_DECLARATION;
use crate::QueryError;
use std::fmt;

/// The shape of a query as determined by [classify].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryShape {
    Ask,
    Describe,
    Select,
    /// `INSERT …`, `DELETE …` and `WITH … DELETE …` updates.
    Update,
    /// `CLEAR`, `CREATE` and `DROP` graph management.
    Graph,
}

impl QueryShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ask => "askQuery",
            Self::Describe => "describeQuery",
            Self::Select => "selectQuery",
            Self::Update => "updateQuery",
            Self::Graph => "graphQuery",
        }
    }

    /// Returns whether queries of this shape only read data.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Ask | Self::Describe | Self::Select)
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the query text without `PREFIX` declarations, trimmed, in lowercase and with runs of
/// whitespace collapsed into single spaces.
pub(crate) fn normalize(query: &str) -> String {
    let stripped = PREFIX_DECLARATION.replace_all(query, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Determines the shape of a query by looking at its leading keyword.
///
/// ```
/// use rdf_memo_query::{classify, QueryShape};
///
/// assert_eq!(classify("ASK { ?s ?p ?o }")?, QueryShape::Ask);
/// assert_eq!(classify("PREFIX ex: <http://example.com/> SELECT ?s WHERE { ?s ex:p ?o }")?, QueryShape::Select);
/// # Result::<_, rdf_memo_query::QueryError>::Ok(())
/// ```
pub fn classify(query: &str) -> Result<QueryShape, QueryError> {
    let normalized = normalize(query);

    if normalized.starts_with("ask") {
        return Ok(QueryShape::Ask);
    }
    if normalized.starts_with("des") {
        return Ok(QueryShape::Describe);
    }
    if normalized.starts_with("select") {
        return Ok(QueryShape::Select);
    }
    if normalized.starts_with("insert") || normalized.starts_with("delete") {
        return Ok(QueryShape::Update);
    }
    if ["clear ", "create", "drop g", "drop s"]
        .iter()
        .any(|keyword| normalized.starts_with(keyword))
    {
        return Ok(QueryShape::Graph);
    }
    if normalized.contains("with") && normalized.contains("delete") && normalized.contains("where")
    {
        return Ok(QueryShape::Update);
    }

    Err(QueryError::UnknownQueryType(query.to_owned()))
}
