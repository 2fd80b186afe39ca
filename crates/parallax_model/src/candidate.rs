//! Service candidates and their transaction behavior.

use serde::{Deserialize, Serialize};

/// How a service candidate participates in transactions when entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionBehavior {
    /// A usable propagated transaction must exist
    Mandatory,
    /// A usable propagated transaction must not exist
    Never,
    /// Any propagated transaction is suspended for the duration of the call
    NotSupported,
    /// Runs within a propagated transaction if one exists, otherwise without
    Supported,
    /// Runs within a propagated transaction, creating one if none exists
    Required,
    /// Always runs within a newly created transaction
    RequiresNew,
}

impl Default for TransactionBehavior {
    /// `Supported` is the only behavior that never changes transaction
    /// shape, so it is what an undeclared candidate gets.
    fn default() -> Self {
        Self::Supported
    }
}

/// A unit of logic that may be relocated between components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCandidate {
    name: String,
    transaction_behavior: TransactionBehavior,
    modified: bool,
}

impl ServiceCandidate {
    /// Create a candidate with the default transaction behavior
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transaction_behavior: TransactionBehavior::default(),
            modified: false,
        }
    }

    /// Set the transaction behavior
    #[must_use]
    pub fn with_transaction_behavior(mut self, behavior: TransactionBehavior) -> Self {
        self.transaction_behavior = behavior;
        self
    }

    /// Mark this candidate as changed relative to the model the trace was
    /// captured under
    #[must_use]
    pub fn as_modified(mut self) -> Self {
        self.modified = true;
        self
    }

    /// Candidate name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transaction behavior on entry
    #[must_use]
    pub const fn transaction_behavior(&self) -> TransactionBehavior {
        self.transaction_behavior
    }

    /// Whether this candidate differs from the captured deployment
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }
}
