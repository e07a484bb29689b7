use rdf_memo_model::{NamedNode, Statement};
use std::collections::BTreeMap;

/// The number of statements sent per `INSERT DATA` query.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Accumulates statements per graph and hands out full batches.
///
/// A batch is released as soon as it holds `batch_size` statements. The partially filled batches
/// are released by [StatementBatcher::finish].
#[derive(Clone, Debug)]
pub struct StatementBatcher {
    batch_size: usize,
    pending: BTreeMap<NamedNode, Vec<Statement>>,
}

impl StatementBatcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            pending: BTreeMap::new(),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Adds `statement` to the batch of `graph`. Returns the batch if it is full.
    pub fn push(
        &mut self,
        graph: &NamedNode,
        statement: Statement,
    ) -> Option<(NamedNode, Vec<Statement>)> {
        let batch = self.pending.entry(graph.clone()).or_default();
        batch.push(statement);
        if batch.len() < self.batch_size {
            return None;
        }
        let batch = self.pending.remove(graph)?;
        Some((graph.clone(), batch))
    }

    /// Returns the remaining, non-empty batches ordered by graph.
    pub fn finish(self) -> impl Iterator<Item = (NamedNode, Vec<Statement>)> {
        self.pending
            .into_iter()
            .filter(|(_, batch)| !batch.is_empty())
    }
}

impl Default for StatementBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
