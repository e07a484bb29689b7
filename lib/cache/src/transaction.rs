use crate::CacheError;
use rdf_memo_model::{NamedNode, Term};
use rdf_memo_store::QueryResult;
use std::collections::BTreeSet;
use std::fmt;
use std::mem;

/// Identifies a logical transaction of a [QueryCache](crate::QueryCache).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cache mutation that can be deferred until the outermost transaction closes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    InvalidateByGraphUri(String),
    InvalidateUnscoped,
    InvalidateAllGraphs,
    InvalidateByQuery(String),
    InvalidateSubjectResources {
        subjects: BTreeSet<Term>,
        graph: NamedNode,
    },
    RememberQueryResult { query: String, result: QueryResult },
}

#[derive(Clone, Debug)]
struct PlacedOperation {
    transaction: TransactionId,
    operation: Operation,
}

#[derive(Clone, Copy, Debug)]
struct OpenedTransaction {
    id: TransactionId,
    closed: bool,
}

/// The open transactions and the operations placed in them.
#[derive(Debug, Default)]
pub(crate) struct Transactions {
    next_id: u64,
    opened: Vec<OpenedTransaction>,
    placed: Vec<PlacedOperation>,
}

impl Transactions {
    pub fn is_active(&self) -> bool {
        !self.opened.is_empty()
    }

    pub fn start(&mut self) -> TransactionId {
        let id = TransactionId(self.next_id);
        self.next_id += 1;
        self.opened.push(OpenedTransaction { id, closed: false });
        id
    }

    /// Places `operation` in the innermost open transaction.
    ///
    /// Returns the operation if no transaction is open.
    pub fn place(&mut self, operation: Operation) -> Option<Operation> {
        let Some(transaction) = self.opened.iter().rev().find(|t| !t.closed) else {
            return Some(operation);
        };
        self.placed.push(PlacedOperation {
            transaction: transaction.id,
            operation,
        });
        None
    }

    /// Closes a transaction.
    ///
    /// Closing the outermost transaction ends all transactions and returns the placed operations
    /// grouped by transaction in opening order. Within a group, the operations keep their
    /// submission order.
    pub fn stop(&mut self, id: TransactionId) -> Result<Option<Vec<Operation>>, CacheError> {
        let Some(position) = self.opened.iter().position(|t| t.id == id && !t.closed) else {
            return Err(CacheError::UnknownTransaction(id));
        };
        if position > 0 {
            self.opened[position].closed = true;
            return Ok(None);
        }

        let opened = mem::take(&mut self.opened);
        let mut placed = mem::take(&mut self.placed);
        let mut operations = Vec::with_capacity(placed.len());
        for transaction in opened {
            let (group, rest) = placed
                .into_iter()
                .partition::<Vec<_>, _>(|p| p.transaction == transaction.id);
            operations.extend(group.into_iter().map(|p| p.operation));
            placed = rest;
        }
        Ok(Some(operations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalidate(query: &str) -> Operation {
        Operation::InvalidateByQuery(query.to_owned())
    }

    #[test]
    fn operations_pass_through_without_transaction() {
        let mut transactions = Transactions::default();
        assert!(!transactions.is_active());
        assert_eq!(transactions.place(invalidate("q")), Some(invalidate("q")));
    }

    #[test]
    fn replays_grouped_by_opening_order() -> Result<(), CacheError> {
        let mut transactions = Transactions::default();
        let outer = transactions.start();
        assert_eq!(transactions.place(invalidate("a")), None);
        let inner = transactions.start();
        assert_eq!(transactions.place(invalidate("b")), None);
        assert_eq!(transactions.stop(inner)?, None);
        assert_eq!(transactions.place(invalidate("c")), None);

        let operations = transactions.stop(outer)?;
        assert_eq!(
            operations,
            Some(vec![invalidate("a"), invalidate("c"), invalidate("b")])
        );
        assert!(!transactions.is_active());
        Ok(())
    }

    #[test]
    fn stopping_twice_fails() -> Result<(), CacheError> {
        let mut transactions = Transactions::default();
        let outer = transactions.start();
        let inner = transactions.start();
        transactions.stop(inner)?;
        assert!(matches!(
            transactions.stop(inner),
            Err(CacheError::UnknownTransaction(id)) if id == inner
        ));
        transactions.stop(outer)?;
        assert!(matches!(
            transactions.stop(outer),
            Err(CacheError::UnknownTransaction(_))
        ));
        Ok(())
    }
}
