use crate::classify::{classify, QueryShape};
use crate::decompose::decompose;
use crate::{QueryError, QueryParts, UpdateSubType};
use rdf_memo_model::Namespaces;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A query text together with its shape and, once requested, its decomposed parts.
///
/// The shape is determined when the query is created. The parts are extracted on the first call
/// to [Query::parts] and never change afterward.
///
/// ```
/// use rdf_memo_query::{Query, QueryShape, UpdateSubType};
///
/// let query = Query::new("DROP SILENT GRAPH <http://g/>")?;
/// assert_eq!(query.shape(), QueryShape::Graph);
/// assert_eq!(query.parts()?.sub_type, Some(UpdateSubType::DropSilentGraph));
/// assert_eq!(query.parts()?.graphs, vec!["http://g/".to_owned()]);
/// # Result::<_, rdf_memo_query::QueryError>::Ok(())
/// ```
#[derive(Clone, Debug)]
pub struct Query {
    text: String,
    shape: QueryShape,
    namespaces: Arc<Namespaces>,
    parts: OnceLock<QueryParts>,
}

impl Query {
    /// Classifies `text` using the default [Namespaces] for prefix expansion.
    pub fn new(text: impl Into<String>) -> Result<Self, QueryError> {
        Self::with_namespaces(text, Arc::new(Namespaces::default()))
    }

    /// Classifies `text` using `namespaces` for prefix expansion.
    pub fn with_namespaces(
        text: impl Into<String>,
        namespaces: Arc<Namespaces>,
    ) -> Result<Self, QueryError> {
        let text = text.into();
        let shape = classify(&text)?;
        Ok(Self {
            text,
            shape,
            namespaces,
            parts: OnceLock::new(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn shape(&self) -> QueryShape {
        self.shape
    }

    /// Returns the decomposed parts, extracting them on the first call.
    pub fn parts(&self) -> Result<&QueryParts, QueryError> {
        if let Some(parts) = self.parts.get() {
            return Ok(parts);
        }
        let parts = decompose(&self.text, self.shape, &self.namespaces)?;
        tracing::trace!(
            shape = %self.shape,
            triples = parts.triple_pattern.len(),
            quads = parts.quad_pattern.len(),
            "Decomposed query"
        );
        Ok(self.parts.get_or_init(|| parts))
    }

    /// Returns the sub type of update and graph management queries.
    pub fn sub_type(&self) -> Result<Option<UpdateSubType>, QueryError> {
        Ok(self.parts()?.sub_type)
    }

    /// Returns every graph IRI the query refers to. See [QueryParts::referenced_graphs].
    pub fn referenced_graphs(&self) -> Result<Vec<String>, QueryError> {
        Ok(self.parts()?.referenced_graphs())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Creates [Query] values that share a namespace table.
#[derive(Clone, Debug, Default)]
pub struct QueryFactory {
    namespaces: Arc<Namespaces>,
}

impl QueryFactory {
    pub fn new(namespaces: Namespaces) -> Self {
        Self {
            namespaces: Arc::new(namespaces),
        }
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn create(&self, text: impl Into<String>) -> Result<Query, QueryError> {
        Query::with_namespaces(text, Arc::clone(&self.namespaces))
    }
}
