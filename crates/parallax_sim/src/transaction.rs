//! Simulated transactions.
//!
//! Transactions form a tree: a top-level transaction owns its commit/abort
//! decision; a subordinate inherits its outcome from its parent. All
//! transactions of one replay live in a per-replay arena, and "the same
//! transaction" means handle equality, not id equality.

use parallax_core::Location;
use serde::{Deserialize, Serialize};

/// Handle into a replay's transaction arena.
///
/// Handle equality is object identity: two handles are the same
/// transaction iff they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHandle(usize);

impl TxHandle {
    /// Raw arena index
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// How a top-level transaction was demarcated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Demarcation {
    /// Started by an explicit transaction-start event
    Explicit,
    /// Opened by the engine because of a candidate's transaction behavior
    Implicit,
}

/// Final outcome of a completed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// The transaction committed
    Committed,
    /// The transaction aborted
    Aborted,
}

/// One transaction within a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: String,
    location: Location,
    demarcation: Demarcation,
    parent: Option<TxHandle>,
    children: Vec<TxHandle>,
    abort_only: bool,
    outcome: Option<TransactionOutcome>,
}

impl Transaction {
    /// Transaction id. Subordinates carry their parent's id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Location the transaction was opened at
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Demarcation mode
    #[must_use]
    pub const fn demarcation(&self) -> Demarcation {
        self.demarcation
    }

    /// Whether this transaction owns its own commit/abort decision
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Parent handle, for subordinates
    #[must_use]
    pub const fn parent(&self) -> Option<TxHandle> {
        self.parent
    }

    /// Subordinate transactions, in creation order
    #[must_use]
    pub fn children(&self) -> &[TxHandle] {
        &self.children
    }

    /// Whether this transaction may only abort
    #[must_use]
    pub const fn is_abort_only(&self) -> bool {
        self.abort_only
    }

    /// Final outcome, once completed
    #[must_use]
    pub const fn outcome(&self) -> Option<TransactionOutcome> {
        self.outcome
    }

    /// Whether the transaction has completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Arena owning all transactions of one replay
#[derive(Debug, Default)]
pub(crate) struct TransactionArena {
    transactions: Vec<Transaction>,
}

impl TransactionArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create_top_level(
        &mut self,
        id: impl Into<String>,
        location: Location,
        demarcation: Demarcation,
    ) -> TxHandle {
        let handle = TxHandle(self.transactions.len());
        self.transactions.push(Transaction {
            id: id.into(),
            location,
            demarcation,
            parent: None,
            children: Vec::new(),
            abort_only: false,
            outcome: None,
        });
        handle
    }

    pub(crate) fn create_subordinate(&mut self, parent: TxHandle, location: Location) -> TxHandle {
        let handle = TxHandle(self.transactions.len());
        let id = self.transactions[parent.0].id.clone();
        self.transactions.push(Transaction {
            id,
            location,
            demarcation: self.transactions[parent.0].demarcation,
            parent: Some(parent),
            children: Vec::new(),
            abort_only: false,
            outcome: None,
        });
        self.transactions[parent.0].children.push(handle);
        handle
    }

    pub(crate) fn get(&self, handle: TxHandle) -> &Transaction {
        &self.transactions[handle.0]
    }

    /// The top-level root of a transaction's tree
    pub(crate) fn root_of(&self, handle: TxHandle) -> TxHandle {
        let mut current = handle;
        while let Some(parent) = self.transactions[current.0].parent {
            current = parent;
        }
        current
    }

    /// Mark a transaction's whole tree abort-only
    pub(crate) fn mark_abort_only(&mut self, handle: TxHandle) {
        let root = self.root_of(handle);
        self.transactions[root.0].abort_only = true;
    }

    pub(crate) fn is_abort_only(&self, handle: TxHandle) -> bool {
        let root = self.root_of(handle);
        self.transactions[root.0].abort_only
    }

    /// Complete a tree with the given outcome.
    ///
    /// Returns the completed handles, root first, subordinates in
    /// depth-first creation order.
    pub(crate) fn complete(
        &mut self,
        handle: TxHandle,
        outcome: TransactionOutcome,
    ) -> Vec<TxHandle> {
        let root = self.root_of(handle);
        let mut completed = Vec::new();
        let mut pending = vec![root];
        while let Some(current) = pending.pop() {
            self.transactions[current.0].outcome = Some(outcome);
            completed.push(current);
            let mut children = self.transactions[current.0].children.clone();
            children.reverse();
            pending.extend(children);
        }
        completed
    }
}
