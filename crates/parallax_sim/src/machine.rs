//! Transaction decision table.
//!
//! Given a candidate's transaction behavior and whether a usable propagated
//! transaction is available (a transaction is active and the connection's
//! propagation mode is not `None`), decides what happens to the transaction
//! context on candidate entry.

use parallax_model::TransactionBehavior;
use thiserror::Error;

/// What the engine does to the transaction context on entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionDecision {
    /// Apply the connection's propagation mode to the existing context
    Keep,
    /// Run without a transaction, regardless of the context
    Suspend,
    /// Create a new implicitly demarcated top-level transaction
    CreateNew,
}

/// Violation of the decision table's fatal cells
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BehaviorViolation {
    /// `Mandatory` entered without a usable transaction
    #[error("transaction behavior is MANDATORY but no usable transaction is available")]
    MissingMandatoryTransaction,
    /// `Never` entered with a usable transaction
    #[error("transaction behavior is NEVER but a usable transaction is available")]
    ForbiddenTransaction,
}

/// Evaluate the decision table
///
/// # Errors
///
/// Returns a violation for the two fatal cells (`Mandatory` without a
/// usable transaction, `Never` with one)
pub fn decide(
    behavior: TransactionBehavior,
    usable_transaction: bool,
) -> Result<TransactionDecision, BehaviorViolation> {
    match (behavior, usable_transaction) {
        (TransactionBehavior::Mandatory, false) => {
            Err(BehaviorViolation::MissingMandatoryTransaction)
        }
        (TransactionBehavior::Mandatory, true) => Ok(TransactionDecision::Keep),
        (TransactionBehavior::Never, false) => Ok(TransactionDecision::Keep),
        (TransactionBehavior::Never, true) => Err(BehaviorViolation::ForbiddenTransaction),
        (TransactionBehavior::NotSupported, _) => Ok(TransactionDecision::Suspend),
        (TransactionBehavior::Supported, _) => Ok(TransactionDecision::Keep),
        (TransactionBehavior::Required, false) => Ok(TransactionDecision::CreateNew),
        (TransactionBehavior::Required, true) => Ok(TransactionDecision::Keep),
        (TransactionBehavior::RequiresNew, _) => Ok(TransactionDecision::CreateNew),
    }
}
