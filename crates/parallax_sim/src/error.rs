//! Trace processing errors.
//!
//! Every error carries the offending event. An error is fatal to the
//! replay of its trace but must not abort other traces in a batch.

use parallax_core::MonitoringEvent;
use thiserror::Error;

/// Result type for trace processing
pub type SimResult<T> = Result<T, SimulationError>;

/// Fatal error while replaying a single trace
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A use case is not mapped to any component
    #[error("no component maps use case '{name}' ({event})")]
    UnmappedUseCase {
        /// Unmapped use case name
        name: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// A service candidate is not mapped to any component
    #[error("no component maps service candidate '{name}' ({event})")]
    UnmappedServiceCandidate {
        /// Unmapped candidate name
        name: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// An entity type is not mapped to any data store
    #[error("no data store maps entity type '{name}' ({event})")]
    UnmappedEntityType {
        /// Unmapped entity type name
        name: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// No connection is declared between two components that communicate
    #[error("no connection from component '{from}' to component '{to}' ({event})")]
    MissingConnection {
        /// Source component name
        from: String,
        /// Target component name
        to: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// An invocation or exit event is not immediately followed by its pair
    #[error("malformed event pairing: expected {expected} ({event})")]
    MalformedEventPairing {
        /// What should have followed
        expected: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// A transaction-demarcation rule was violated
    #[error("invalid transaction state: {reason} ({event})")]
    InvalidTransactionState {
        /// Explanation
        reason: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// A connection's remote/local classification contradicts the observed
    /// location change
    #[error("invalid location transition: {reason} ({event})")]
    InvalidLocationTransition {
        /// Explanation
        reason: String,
        /// Offending event
        event: MonitoringEvent,
    },

    /// An event arrived in a state where it cannot be processed
    #[error("unexpected event: {reason} ({event})")]
    UnexpectedEvent {
        /// Explanation
        reason: String,
        /// Offending event
        event: MonitoringEvent,
    },
}

impl SimulationError {
    /// The event that made the replay fail
    #[must_use]
    pub fn offending_event(&self) -> &MonitoringEvent {
        match self {
            Self::UnmappedUseCase { event, .. }
            | Self::UnmappedServiceCandidate { event, .. }
            | Self::UnmappedEntityType { event, .. }
            | Self::MissingConnection { event, .. }
            | Self::MalformedEventPairing { event, .. }
            | Self::InvalidTransactionState { event, .. }
            | Self::InvalidLocationTransition { event, .. }
            | Self::UnexpectedEvent { event, .. } => event,
        }
    }
}
