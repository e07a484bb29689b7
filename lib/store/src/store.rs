use crate::batch::StatementBatcher;
use crate::{sparql, QueryResult, StatementIterator, StoreError};
use oxrdfio::RdfParser;
use rdf_memo_model::{NamedNode, Statement, Term};
use rdf_memo_query::{PatternTerm, QueryParts};
use std::io::Read;

/// A store that answers query text and offers operations on statements.
///
/// Only [Store::query] must be implemented. The statement operations translate into query text
/// and delegate to [Store::query], which is the only operation that reaches the backend.
///
/// Statements are always added to, and deleted from, a named graph. The graph is either given by
/// the caller or taken from the statement (see [resolve_graph]).
pub trait Store {
    /// Executes a query or an update.
    fn query(&mut self, query: &str) -> Result<QueryResult, StoreError>;

    /// Adds concrete statements.
    ///
    /// Fails with [StoreError::NonConcreteStatement] before anything is sent if one of the
    /// statements is a pattern. Statements are sent in batches of
    /// [DEFAULT_BATCH_SIZE](crate::DEFAULT_BATCH_SIZE) per graph.
    fn add_statements(
        &mut self,
        statements: &[Statement],
        graph: Option<&NamedNode>,
    ) -> Result<(), StoreError> {
        let resolved = resolve_statements(statements, graph)?;

        let mut batcher = StatementBatcher::default();
        for (graph, statement) in resolved {
            if let Some((graph, batch)) = batcher.push(&graph, statement.clone()) {
                flush(self, &graph, &batch)?;
            }
        }
        for (graph, batch) in batcher.finish() {
            flush(self, &graph, &batch)?;
        }
        Ok(())
    }

    /// Deletes all statements of the resolved graph that match `pattern`.
    fn delete_matching_statements(
        &mut self,
        pattern: &Statement,
        graph: Option<&NamedNode>,
    ) -> Result<(), StoreError> {
        let graph = resolve_graph(pattern, graph)?;
        self.query(&sparql::delete_where(&graph, pattern))?;
        Ok(())
    }

    /// Returns all statements that match `pattern`.
    ///
    /// Without a graph given by the caller or the pattern, the statements of all named graphs are
    /// returned.
    fn get_matching_statements(
        &mut self,
        pattern: &Statement,
        graph: Option<&NamedNode>,
    ) -> Result<StatementIterator, StoreError> {
        let graph = graph.or_else(|| pattern.graph_name());
        let solutions = match self.query(&sparql::select_matching(pattern, graph))? {
            QueryResult::Solutions(solutions) => solutions,
            result => {
                return Err(StoreError::UnexpectedResult {
                    expected: "solutions",
                    found: result.kind().to_owned(),
                })
            }
        };

        let statements = solutions
            .iter()
            .map(|solution| {
                let [Some(subject), Some(predicate), Some(object), rest @ ..] = solution else {
                    return Err(StoreError::UnexpectedResult {
                        expected: "bound subject, predicate and object",
                        found: format!("{solution:?}"),
                    });
                };
                let graph = match graph {
                    Some(graph) => Some(Term::from(graph.clone())),
                    None => rest.first().cloned().flatten(),
                };
                Ok(Statement::new(
                    subject.clone(),
                    predicate.clone(),
                    object.clone(),
                    graph,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatementIterator::new(statements))
    }

    /// Checks whether any statement matches `pattern`.
    fn has_matching_statement(
        &mut self,
        pattern: &Statement,
        graph: Option<&NamedNode>,
    ) -> Result<bool, StoreError> {
        let graph = graph.or_else(|| pattern.graph_name());
        match self.query(&sparql::ask_matching(pattern, graph))? {
            QueryResult::Boolean(result) => Ok(result),
            result => Err(StoreError::UnexpectedResult {
                expected: "a boolean",
                found: result.kind().to_owned(),
            }),
        }
    }

    /// Parses an RDF document and adds its statements.
    ///
    /// Statements of the document's default graph are added to `graph`. Returns the number of
    /// parsed statements.
    ///
    /// ```
    /// use oxrdfio::RdfFormat;
    /// use rdf_memo_model::{NamedNode, Statement, Variable};
    /// use rdf_memo_store::{MemoryStore, Store};
    ///
    /// let mut store = MemoryStore::default();
    /// let graph = NamedNode::new("http://example.com/g")?;
    /// let file = b"<http://example.com/s> <http://example.com/p> \"o\" .";
    /// assert_eq!(store.load_from_reader(RdfFormat::NTriples, file.as_ref(), Some(&graph))?, 1);
    ///
    /// let pattern = Statement::new_triple(Variable::any(), Variable::any(), Variable::any());
    /// assert!(store.has_matching_statement(&pattern, Some(&graph))?);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    fn load_from_reader(
        &mut self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
        graph: Option<&NamedNode>,
    ) -> Result<usize, StoreError>
    where
        Self: Sized,
    {
        let statements = parser
            .into()
            .rename_blank_nodes()
            .for_reader(reader)
            .map(|quad| -> Result<Statement, StoreError> { Ok(Statement::try_from(quad?)?) })
            .collect::<Result<Vec<_>, _>>()?;
        let count = statements.len();
        let statements = statements
            .into_iter()
            .map(|statement| match (&statement.graph, graph) {
                (None, Some(graph)) => statement.with_graph(Some(graph.clone().into())),
                _ => statement,
            })
            .collect::<Vec<_>>();
        self.add_statements(&statements, None)?;
        Ok(count)
    }
}

fn flush<S: Store + ?Sized>(
    store: &mut S,
    graph: &NamedNode,
    batch: &[Statement],
) -> Result<(), StoreError> {
    tracing::debug!(graph = %graph, statements = batch.len(), "Flushing insert batch");
    store.query(&sparql::insert_data(graph, batch))?;
    Ok(())
}

/// Returns the graph a statement operation targets.
///
/// The explicit `graph` takes precedence over the named graph of `statement`.
pub fn resolve_graph(
    statement: &Statement,
    graph: Option<&NamedNode>,
) -> Result<NamedNode, StoreError> {
    graph
        .or_else(|| statement.graph_name())
        .cloned()
        .ok_or_else(|| StoreError::NoGraphSpecified(statement.to_string()))
}

/// Resolves the graph of every statement after checking that all statements are concrete.
pub fn resolve_statements<'a>(
    statements: &'a [Statement],
    graph: Option<&NamedNode>,
) -> Result<Vec<(NamedNode, &'a Statement)>, StoreError> {
    if let Some(pattern) = statements.iter().find(|s| s.is_pattern()) {
        return Err(StoreError::NonConcreteStatement(pattern.to_string()));
    }
    statements
        .iter()
        .map(|statement| Ok((resolve_graph(statement, graph)?, statement)))
        .collect()
}

/// Re-derives the statements of decomposed update parts.
///
/// Quad patterns keep their graph. Triple patterns are placed in the first graph of the parts
/// (e.g., the graph of `INSERT INTO` or `WITH`), if there is one.
pub fn statements_from_parts(parts: &QueryParts) -> Result<Vec<Statement>, StoreError> {
    let default_graph = parts
        .graphs
        .first()
        .map(|graph| NamedNode::new(graph).map(Term::from))
        .transpose()?;

    let triples = parts.triple_pattern.iter().map(|triple| {
        statement(
            &triple.subject,
            &triple.predicate,
            &triple.object,
            default_graph.clone(),
        )
    });
    let quads = parts.quad_pattern.iter().map(|quad| {
        statement(
            &quad.subject,
            &quad.predicate,
            &quad.object,
            Some(quad.graph.to_term()?),
        )
    });
    triples.chain(quads).collect()
}

fn statement(
    subject: &PatternTerm,
    predicate: &PatternTerm,
    object: &PatternTerm,
    graph: Option<Term>,
) -> Result<Statement, StoreError> {
    Ok(Statement::new(
        subject.to_term()?,
        predicate.to_term()?,
        object.to_term()?,
        graph,
    ))
}
