//! Per-trace simulation context.
//!
//! Mutable state owned by the engine for the duration of one replay:
//! current component, location, service candidate and transaction, plus
//! the LIFO stack of these tuples pushed on candidate entry and popped on
//! return. Never shared across concurrent replays.

use crate::transaction::{Transaction, TransactionArena, TxHandle};
use parallax_core::Location;

/// A saved context tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFrame {
    /// Component active when the frame was pushed
    pub component: Option<String>,
    /// Location active when the frame was pushed
    pub location: Option<Location>,
    /// Service candidate active when the frame was pushed
    pub candidate: Option<String>,
    /// Transaction active when the frame was pushed
    pub transaction: Option<TxHandle>,
}

/// Mutable per-replay state
#[derive(Debug, Default)]
pub struct SimulationContext {
    current_component: Option<String>,
    current_location: Option<Location>,
    current_candidate: Option<String>,
    current_transaction: Option<TxHandle>,
    stack: Vec<ContextFrame>,
    arena: TransactionArena,
}

impl SimulationContext {
    /// Create a fresh context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active component
    #[must_use]
    pub fn current_component(&self) -> Option<&str> {
        self.current_component.as_deref()
    }

    /// Currently active location
    #[must_use]
    pub const fn current_location(&self) -> Option<&Location> {
        self.current_location.as_ref()
    }

    /// Currently active service candidate
    #[must_use]
    pub fn current_candidate(&self) -> Option<&str> {
        self.current_candidate.as_deref()
    }

    /// Currently active transaction
    #[must_use]
    pub const fn current_transaction(&self) -> Option<TxHandle> {
        self.current_transaction
    }

    /// Resolve a transaction handle
    #[must_use]
    pub fn transaction(&self, handle: TxHandle) -> &Transaction {
        self.arena.get(handle)
    }

    /// The top-level root of a transaction's tree
    #[must_use]
    pub fn root_of(&self, handle: TxHandle) -> TxHandle {
        self.arena.root_of(handle)
    }

    /// Call-stack depth
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn set_current_component(&mut self, component: Option<String>) {
        self.current_component = component;
    }

    pub(crate) fn set_current_location(&mut self, location: Option<Location>) {
        self.current_location = location;
    }

    pub(crate) fn set_current_candidate(&mut self, candidate: Option<String>) {
        self.current_candidate = candidate;
    }

    pub(crate) fn set_current_transaction(&mut self, transaction: Option<TxHandle>) {
        self.current_transaction = transaction;
    }

    pub(crate) fn arena(&self) -> &TransactionArena {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut TransactionArena {
        &mut self.arena
    }

    /// Save the current tuple on the stack
    pub(crate) fn push_frame(&mut self) {
        self.stack.push(ContextFrame {
            component: self.current_component.clone(),
            location: self.current_location.clone(),
            candidate: self.current_candidate.clone(),
            transaction: self.current_transaction,
        });
    }

    /// The frame that will be restored by the next pop
    pub(crate) fn top_frame(&self) -> Option<&ContextFrame> {
        self.stack.last()
    }

    /// Restore the most recently saved tuple
    pub(crate) fn pop_frame(&mut self) -> Option<ContextFrame> {
        let frame = self.stack.pop()?;
        self.current_component = frame.component.clone();
        self.current_location = frame.location.clone();
        self.current_candidate = frame.candidate.clone();
        self.current_transaction = frame.transaction;
        Some(frame)
    }

    /// Clear all current fields (use-case boundary)
    pub(crate) fn clear_current(&mut self) {
        self.current_component = None;
        self.current_location = None;
        self.current_candidate = None;
        self.current_transaction = None;
    }
}
