//! PARALLAX Trace Simulation Engine
//!
//! Replays a recorded trace against a deployment model: walks the event
//! stream once, tracks call-stack context, derives the active transaction
//! at every point, detects entity conflicts, and drives listener callbacks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conflict;
pub mod context;
pub mod engine;
pub mod error;
pub mod listener;
pub mod machine;
pub mod transaction;

// Re-exports
pub use conflict::{ConflictCollector, ConflictKind, ConsistencyFinding};
pub use context::{ContextFrame, SimulationContext};
pub use engine::{SimulatorConfig, SyntheticLocationRule, TraceSimulator, TraceSummary};
pub use error::{SimResult, SimulationError};
pub use listener::{TraceSimulationListener, TransitionDirection};
pub use machine::{decide, BehaviorViolation, TransactionDecision};
pub use transaction::{Demarcation, Transaction, TransactionOutcome, TxHandle};
