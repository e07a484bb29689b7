use crate::storage::{
    graph_key, pattern_key, query_key, related_key, GRAPH_PREFIX, PATTERN_PREFIX,
};
use crate::transaction::{Operation, Transactions};
use crate::{
    fingerprint, CacheEntry, CacheError, CacheStorage, CacheValue, KeyPart, MemoryCacheStorage,
    PatternKey, TransactionId, UNSCOPED_GRAPH_ID,
};
use rdf_memo_model::{NamedNode, Statement, Term};
use rdf_memo_query::{QueryFactory, QueryParts};
use rdf_memo_store::{
    resolve_graph, resolve_statements, sparql, QueryResult, Store, StoreError,
};
use std::collections::{BTreeMap, BTreeSet};

/// A [Store] that caches the results of read queries and forwards everything else to its
/// successor.
///
/// Every cached result is indexed by the graphs its query reads and by the [PatternKey]s of its
/// triple patterns. Updates that pass through the cache invalidate the entries of the graphs
/// they touch. Statements added through [Store::add_statements] only invalidate the entries
/// whose patterns could match the new subjects.
///
/// While a transaction is open (see [QueryCache::start_transaction]), invalidations and new
/// entries are buffered and only applied once the outermost transaction is closed.
///
/// ```
/// use rdf_memo_cache::QueryCache;
/// use rdf_memo_model::{NamedNode, Statement, Variable};
/// use rdf_memo_store::{MemoryStore, Store};
///
/// let graph = NamedNode::new("http://example.com/g")?;
/// let mut cache = QueryCache::in_memory(MemoryStore::default());
/// let pattern = Statement::new_triple(Variable::any(), Variable::any(), Variable::any());
/// assert!(!cache.has_matching_statement(&pattern, Some(&graph))?);
///
/// let statement = Statement::new_triple(graph.clone(), graph.clone(), graph.clone());
/// cache.add_statements(&[statement], Some(&graph))?;
/// assert!(cache.has_matching_statement(&pattern, Some(&graph))?);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct QueryCache<S = MemoryCacheStorage> {
    storage: S,
    factory: QueryFactory,
    successor: Option<Box<dyn Store>>,
    transactions: Transactions,
}

impl QueryCache {
    /// Creates a cache held in memory that forwards to `successor`.
    pub fn in_memory(successor: impl Store + 'static) -> Self {
        Self::new(
            MemoryCacheStorage::new(),
            QueryFactory::default(),
            Some(Box::new(successor)),
        )
    }
}

impl<S: CacheStorage> QueryCache<S> {
    /// Creates a new cache. The `successor` answers all queries the cache cannot answer.
    pub fn new(storage: S, factory: QueryFactory, successor: Option<Box<dyn Store>>) -> Self {
        Self {
            storage,
            factory,
            successor,
            transactions: Transactions::default(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn factory(&self) -> &QueryFactory {
        &self.factory
    }

    /// Returns the cache entry of a query text.
    pub fn entry(&self, query: &str) -> Result<Option<CacheEntry>, CacheError> {
        self.load_entry(&fingerprint(query))
    }

    /// Returns the cached result of a query text.
    pub fn cached_result(&self, query: &str) -> Result<Option<QueryResult>, CacheError> {
        Ok(self.entry(query)?.map(|entry| entry.result))
    }

    /// Returns whether a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.transactions.is_active()
    }

    /// Opens a transaction. Transactions can be nested.
    pub fn start_transaction(&mut self) -> TransactionId {
        let id = self.transactions.start();
        tracing::debug!(transaction = %id, "Started cache transaction");
        id
    }

    /// Closes a transaction.
    ///
    /// Closing the outermost transaction applies all buffered operations. The entries remembered
    /// while it was open become related: invalidating one of them invalidates all of them. A
    /// failing operation does not stop the replay; the first error is returned at the end.
    pub fn stop_transaction(&mut self, id: TransactionId) -> Result<(), CacheError> {
        let Some(operations) = self.transactions.stop(id)? else {
            tracing::debug!(transaction = %id, "Stopped nested cache transaction");
            return Ok(());
        };
        tracing::debug!(
            transaction = %id,
            operations = operations.len(),
            "Replaying cache transaction"
        );

        let mut remembered: Vec<String> = Vec::new();
        let mut first_error = None;
        for operation in operations {
            if let Operation::RememberQueryResult { query, .. } = &operation {
                if !remembered.contains(query) {
                    remembered.push(query.clone());
                }
            }
            if let Err(error) = self.apply(operation) {
                tracing::warn!(transaction = %id, %error, "Failed to replay cache operation");
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        self.relate(&remembered)?;
        first_error.map_or(Ok(()), Err)
    }

    /// Stores the result of a query.
    ///
    /// An existing entry of the same query text is replaced. The query text is decomposed right
    /// away, even inside a transaction.
    pub fn remember_query_result(
        &mut self,
        query: &str,
        result: QueryResult,
    ) -> Result<(), CacheError> {
        self.factory.create(query)?.parts()?;
        self.submit(Operation::RememberQueryResult {
            query: query.to_owned(),
            result,
        })
    }

    /// Removes every entry that reads `graph`, including the entries of queries without an
    /// explicit graph.
    pub fn invalidate_by_graph_uri(&mut self, graph: &str) -> Result<(), CacheError> {
        self.submit(Operation::InvalidateByGraphUri(graph.to_owned()))
    }

    /// Removes every entry of a query without an explicit graph.
    pub fn invalidate_unscoped(&mut self) -> Result<(), CacheError> {
        self.submit(Operation::InvalidateUnscoped)
    }

    /// Removes the entries of all graphs, including the entries of queries without an explicit
    /// graph.
    pub fn invalidate_all_graphs(&mut self) -> Result<(), CacheError> {
        self.submit(Operation::InvalidateAllGraphs)
    }

    /// Removes the entry of a query text and the entries related to it.
    ///
    /// Nothing happens if the query is not cached.
    pub fn invalidate_by_query(&mut self, query: &str) -> Result<(), CacheError> {
        self.submit(Operation::InvalidateByQuery(query.to_owned()))
    }

    /// Removes the entries that could read one of the subjects of `statements` in `graph`.
    ///
    /// These are the resource queries of the subjects and all entries with a pattern whose
    /// subject is one of the subjects or is not fixed.
    pub fn invalidate_subject_resources(
        &mut self,
        statements: &[Statement],
        graph: &NamedNode,
    ) -> Result<(), CacheError> {
        self.submit(Operation::InvalidateSubjectResources {
            subjects: statements
                .iter()
                .map(|statement| statement.subject.clone())
                .collect(),
            graph: graph.clone(),
        })
    }

    fn submit(&mut self, operation: Operation) -> Result<(), CacheError> {
        match self.transactions.place(operation) {
            Some(operation) => self.apply(operation),
            None => Ok(()),
        }
    }

    fn apply(&mut self, operation: Operation) -> Result<(), CacheError> {
        match operation {
            Operation::InvalidateByGraphUri(graph) => {
                tracing::debug!(graph, "Invalidating graph");
                self.invalidate_graph_index(&fingerprint(&graph))?;
                self.invalidate_graph_index(UNSCOPED_GRAPH_ID)
            }
            Operation::InvalidateUnscoped => {
                tracing::debug!("Invalidating queries without graph");
                self.invalidate_graph_index(UNSCOPED_GRAPH_ID)
            }
            Operation::InvalidateAllGraphs => {
                let graph_ids = self
                    .storage
                    .keys()
                    .into_iter()
                    .filter_map(|key| key.strip_prefix(GRAPH_PREFIX).map(str::to_owned))
                    .collect::<Vec<_>>();
                tracing::debug!(graphs = graph_ids.len(), "Invalidating all graphs");
                for graph_id in graph_ids {
                    self.invalidate_graph_index(&graph_id)?;
                }
                Ok(())
            }
            Operation::InvalidateByQuery(query) => {
                self.invalidate_entry(&fingerprint(&query), true)
            }
            Operation::InvalidateSubjectResources { subjects, graph } => {
                self.invalidate_subjects(&subjects, &graph)
            }
            Operation::RememberQueryResult { query, result } => self.store_entry(&query, result),
        }
    }

    /// Removes the resource queries of `subjects` and the entries with a pattern in `graph`
    /// whose subject is one of `subjects` or is not fixed.
    fn invalidate_subjects(
        &mut self,
        subjects: &BTreeSet<Term>,
        graph: &NamedNode,
    ) -> Result<(), CacheError> {
        let mut affected = subjects
            .iter()
            .map(|subject| fingerprint(&sparql::subject_resource(graph, subject)))
            .collect::<Vec<_>>();

        let graph_id = fingerprint(graph.as_str());
        let touched = subjects.iter().map(KeyPart::of_term).collect::<BTreeSet<_>>();
        for key in self.storage.keys() {
            let Some(pattern) = key.strip_prefix(PATTERN_PREFIX) else {
                continue;
            };
            let pattern = pattern
                .parse::<PatternKey>()
                .map_err(|error| CacheError::IndexInconsistency(error.to_string()))?;
            if pattern.graph_id != graph_id && pattern.graph_id != UNSCOPED_GRAPH_ID {
                continue;
            }
            if pattern.subject.is_wildcard() || touched.contains(&pattern.subject) {
                for query_id in self.load_ids(&key)?.unwrap_or_default() {
                    if !affected.contains(&query_id) {
                        affected.push(query_id);
                    }
                }
            }
        }

        tracing::debug!(
            graph = %graph,
            subjects = touched.len(),
            entries = affected.len(),
            "Invalidating subject resources"
        );
        for query_id in affected {
            self.invalidate_entry(&query_id, true)?;
        }
        Ok(())
    }

    fn store_entry(&mut self, text: &str, result: QueryResult) -> Result<(), CacheError> {
        let query = self.factory.create(text)?;
        let parts = query.parts()?;
        let query_id = fingerprint(text);
        self.invalidate_entry(&query_id, false)?;

        let scopes = scopes(parts);
        let mut entry = CacheEntry::new(text, result);
        for key in pattern_keys(parts, &scopes) {
            self.add_to_index(&pattern_key(&key), &query_id)?;
            entry.add_pattern_key(key);
        }
        for graph_id in scopes {
            self.add_to_index(&graph_key(&graph_id), &query_id)?;
            entry.graph_ids.insert(graph_id);
        }

        tracing::debug!(
            query = text,
            graphs = entry.graph_ids.len(),
            patterns = entry.all_pattern_keys().count(),
            "Remembered query result"
        );
        self.storage
            .set(&query_key(&query_id), CacheValue::Entry(Box::new(entry)));
        Ok(())
    }

    /// Removes an entry from all indices. With `cascade`, the related entries are removed too,
    /// but not the entries related to those.
    fn invalidate_entry(&mut self, query_id: &str, cascade: bool) -> Result<(), CacheError> {
        let Some(entry) = self.load_entry(query_id)? else {
            return Ok(());
        };
        for graph_id in &entry.graph_ids {
            self.remove_from_index(&graph_key(graph_id), query_id)?;
        }
        for key in entry.all_pattern_keys() {
            self.remove_from_index(&pattern_key(key), query_id)?;
        }
        self.storage.delete(&query_key(query_id));
        tracing::trace!(query = entry.query.as_str(), "Invalidated cache entry");

        let Some(related_id) = &entry.related_entries_id else {
            return Ok(());
        };
        if !cascade {
            return self.unrelate(related_id, &entry.query);
        }
        let Some(related) = self.load_related(related_id)? else {
            return Ok(());
        };
        self.storage.delete(&related_key(related_id));
        for sibling in related.iter().filter(|sibling| **sibling != entry.query) {
            self.invalidate_entry(&fingerprint(sibling), false)?;
        }
        Ok(())
    }

    /// Removes `query` from a related list. A list with less than two queries left is deleted.
    fn unrelate(&mut self, related_id: &str, query: &str) -> Result<(), CacheError> {
        let Some(mut related) = self.load_related(related_id)? else {
            return Ok(());
        };
        related.retain(|sibling| sibling != query);
        let key = related_key(related_id);
        if related.len() < 2 {
            self.storage.delete(&key);
        } else {
            self.storage.set(&key, CacheValue::Related(related));
        }
        Ok(())
    }

    fn invalidate_graph_index(&mut self, graph_id: &str) -> Result<(), CacheError> {
        let key = graph_key(graph_id);
        while let Some(query_id) = self
            .load_ids(&key)?
            .and_then(|query_ids| query_ids.into_iter().next())
        {
            if self.load_entry(&query_id)?.is_none() {
                return Err(CacheError::IndexInconsistency(format!(
                    "{key} refers to the missing entry {query_id}"
                )));
            }
            self.invalidate_entry(&query_id, true)?;
            if self
                .load_ids(&key)?
                .is_some_and(|query_ids| query_ids.contains(&query_id))
            {
                return Err(CacheError::IndexInconsistency(format!(
                    "the entry {query_id} is not recorded under {key}"
                )));
            }
        }
        self.storage.delete(&key);
        Ok(())
    }

    /// Links the entries of `queries` that are still cached.
    fn relate(&mut self, queries: &[String]) -> Result<(), CacheError> {
        let mut entries = Vec::new();
        for query in queries {
            let query_id = fingerprint(query);
            if let Some(entry) = self.load_entry(&query_id)? {
                entries.push((query_id, entry));
            }
        }
        if entries.len() < 2 {
            return Ok(());
        }

        let related_id = fingerprint(&queries.join("\n"));
        let mut related = Vec::with_capacity(entries.len());
        for (query_id, mut entry) in entries {
            if let Some(previous) = entry.related_entries_id.replace(related_id.clone()) {
                if previous != related_id {
                    self.unrelate(&previous, &entry.query)?;
                }
            }
            related.push(entry.query.clone());
            self.storage
                .set(&query_key(&query_id), CacheValue::Entry(Box::new(entry)));
        }
        tracing::debug!(entries = related.len(), "Related cache entries");
        self.storage
            .set(&related_key(&related_id), CacheValue::Related(related));
        Ok(())
    }

    fn load_related(&self, related_id: &str) -> Result<Option<Vec<String>>, CacheError> {
        let key = related_key(related_id);
        match self.storage.get(&key) {
            None => Ok(None),
            Some(CacheValue::Related(related)) => Ok(Some(related)),
            Some(_) => Err(unexpected_value(&key)),
        }
    }

    fn load_entry(&self, query_id: &str) -> Result<Option<CacheEntry>, CacheError> {
        let key = query_key(query_id);
        match self.storage.get(&key) {
            None => Ok(None),
            Some(CacheValue::Entry(entry)) => Ok(Some(*entry)),
            Some(_) => Err(unexpected_value(&key)),
        }
    }

    fn load_ids(&self, key: &str) -> Result<Option<Vec<String>>, CacheError> {
        match self.storage.get(key) {
            None => Ok(None),
            Some(CacheValue::QueryIds(query_ids)) => Ok(Some(query_ids)),
            Some(_) => Err(unexpected_value(key)),
        }
    }

    fn add_to_index(&mut self, key: &str, query_id: &str) -> Result<(), CacheError> {
        let mut query_ids = self.load_ids(key)?.unwrap_or_default();
        if !query_ids.iter().any(|id| id == query_id) {
            query_ids.push(query_id.to_owned());
        }
        self.storage.set(key, CacheValue::QueryIds(query_ids));
        Ok(())
    }

    fn remove_from_index(&mut self, key: &str, query_id: &str) -> Result<(), CacheError> {
        let Some(mut query_ids) = self.load_ids(key)? else {
            return Err(CacheError::IndexInconsistency(format!(
                "{key} is missing for the entry {query_id}"
            )));
        };
        let Some(position) = query_ids.iter().position(|id| id == query_id) else {
            return Err(CacheError::IndexInconsistency(format!(
                "{key} does not refer to the entry {query_id}"
            )));
        };
        query_ids.remove(position);
        if query_ids.is_empty() {
            self.storage.delete(key);
        } else {
            self.storage.set(key, CacheValue::QueryIds(query_ids));
        }
        Ok(())
    }

    fn successor(&mut self, request: &str) -> Result<&mut (dyn Store + 'static), StoreError> {
        self.successor
            .as_deref_mut()
            .ok_or_else(|| StoreError::NoChainSuccessor(request.to_owned()))
    }
}

impl<S: CacheStorage> Store for QueryCache<S> {
    fn query(&mut self, query: &str) -> Result<QueryResult, StoreError> {
        let parsed = self.factory.create(query)?;
        let graphs = parsed.referenced_graphs()?;

        if parsed.shape().is_read_only() {
            if let Some(result) = self.cached_result(query)? {
                tracing::debug!(query, "Cache hit");
                return Ok(result);
            }
            tracing::debug!(query, "Cache miss");
            let result = self.successor(query)?.query(query)?;
            self.remember_query_result(query, result.clone())?;
            return Ok(result);
        }

        let result = self.successor(query)?.query(query)?;
        if parsed.parts()?.quad_pattern.iter().any(|quad| !quad.graph.is_uri()) {
            self.invalidate_all_graphs()?;
        } else if graphs.is_empty() {
            self.invalidate_unscoped()?;
        }
        for graph in &graphs {
            self.invalidate_by_graph_uri(graph)?;
        }
        Ok(result)
    }

    fn add_statements(
        &mut self,
        statements: &[Statement],
        graph: Option<&NamedNode>,
    ) -> Result<(), StoreError> {
        let mut by_graph: BTreeMap<NamedNode, Vec<Statement>> = BTreeMap::new();
        for (target, statement) in resolve_statements(statements, graph)? {
            by_graph.entry(target).or_default().push(statement.clone());
        }

        self.successor("INSERT DATA")?
            .add_statements(statements, graph)?;
        for (target, statements) in &by_graph {
            self.invalidate_subject_resources(statements, target)?;
        }
        Ok(())
    }

    fn delete_matching_statements(
        &mut self,
        pattern: &Statement,
        graph: Option<&NamedNode>,
    ) -> Result<(), StoreError> {
        let target = resolve_graph(pattern, graph)?;
        self.successor(&sparql::delete_where(&target, pattern))?
            .delete_matching_statements(pattern, graph)?;
        self.invalidate_by_graph_uri(target.as_str())?;
        Ok(())
    }
}

/// Returns the ids of the graph indices a query is recorded under.
fn scopes(parts: &QueryParts) -> Vec<String> {
    let mut scopes = parts
        .referenced_graphs()
        .iter()
        .map(|graph| fingerprint(graph))
        .collect::<Vec<_>>();
    if scopes.is_empty() || parts.quad_pattern.iter().any(|quad| !quad.graph.is_uri()) {
        scopes.push(UNSCOPED_GRAPH_ID.to_owned());
    }
    scopes
}

fn pattern_keys(parts: &QueryParts, scopes: &[String]) -> BTreeSet<PatternKey> {
    let mut keys = BTreeSet::new();
    for triple in &parts.triple_pattern {
        keys.extend(scopes.iter().map(|scope| PatternKey::new(scope.as_str(), triple)));
    }
    for quad in &parts.quad_pattern {
        let scope = if quad.graph.is_uri() {
            fingerprint(&quad.graph.value)
        } else {
            UNSCOPED_GRAPH_ID.to_owned()
        };
        keys.insert(PatternKey::new(scope, &quad.triple()));
    }
    keys
}

fn unexpected_value(key: &str) -> CacheError {
    CacheError::IndexInconsistency(format!("{key} holds a value of another kind"))
}
