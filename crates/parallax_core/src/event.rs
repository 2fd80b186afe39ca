//! Monitoring events recorded during a traced execution.
//!
//! Events are immutable value objects. The variant set is closed; every
//! dispatch site matches exhaustively.

use crate::entity::Entity;
use crate::location::Location;
use crate::time::Timestamp;
use crate::trace::TraceId;
use serde::{Deserialize, Serialize};

/// Event kind with per-kind payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A use case began
    UseCaseStart {
        /// Use case name
        name: String,
    },
    /// A use case ended
    UseCaseEnd {
        /// Use case name
        name: String,
    },
    /// A service candidate was invoked at the caller side
    CandidateInvocation {
        /// Service candidate name
        name: String,
    },
    /// A service candidate was entered at the callee side
    CandidateEntry {
        /// Service candidate name
        name: String,
        /// Whether a transaction was started on entry in the original run
        starts_transaction: bool,
        /// Id of the transaction started on entry, if recorded
        transaction_id: Option<String>,
    },
    /// A service candidate was exited at the callee side
    CandidateExit {
        /// Service candidate name
        name: String,
    },
    /// Control returned to the caller side
    CandidateReturn {
        /// Service candidate name
        name: String,
    },
    /// A transaction was started explicitly
    TransactionStart {
        /// Transaction id
        transaction_id: String,
    },
    /// A transaction was committed explicitly
    TransactionCommit {
        /// Transaction id
        transaction_id: String,
    },
    /// A transaction was aborted
    TransactionAbort {
        /// Transaction id
        transaction_id: String,
        /// Whether the abort was demarcated explicitly or recorded implicitly
        explicit: bool,
        /// Abort cause, if recorded
        cause: Option<String>,
    },
    /// An entity was read
    EntityRead {
        /// Entity that was read
        entity: Entity,
    },
    /// An entity was written
    EntityWrite {
        /// Entity that was written
        entity: Entity,
    },
}

impl EventKind {
    /// Service candidate name, for the four candidate-call kinds
    #[must_use]
    pub fn candidate_name(&self) -> Option<&str> {
        match self {
            Self::CandidateInvocation { name }
            | Self::CandidateEntry { name, .. }
            | Self::CandidateExit { name }
            | Self::CandidateReturn { name } => Some(name),
            _ => None,
        }
    }

    /// Whether this kind demarcates a transaction
    #[must_use]
    pub const fn is_transaction_demarcation(&self) -> bool {
        matches!(
            self,
            Self::TransactionStart { .. }
                | Self::TransactionCommit { .. }
                | Self::TransactionAbort { .. }
        )
    }

    /// Whether this kind accesses an entity
    #[must_use]
    pub const fn is_entity_access(&self) -> bool {
        matches!(self, Self::EntityRead { .. } | Self::EntityWrite { .. })
    }

    /// Short tag for diagnostics
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::UseCaseStart { .. } => "UseCaseStart",
            Self::UseCaseEnd { .. } => "UseCaseEnd",
            Self::CandidateInvocation { .. } => "CandidateInvocation",
            Self::CandidateEntry { .. } => "CandidateEntry",
            Self::CandidateExit { .. } => "CandidateExit",
            Self::CandidateReturn { .. } => "CandidateReturn",
            Self::TransactionStart { .. } => "TransactionStart",
            Self::TransactionCommit { .. } => "TransactionCommit",
            Self::TransactionAbort { .. } => "TransactionAbort",
            Self::EntityRead { .. } => "EntityRead",
            Self::EntityWrite { .. } => "EntityWrite",
        }
    }
}

/// A single monitoring event within a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringEvent {
    /// Trace this event belongs to
    pub trace_id: TraceId,
    /// Timestamp on the trace's time axis
    pub timestamp: Timestamp,
    /// Where the event was observed
    pub location: Location,
    /// Event kind and payload
    pub kind: EventKind,
}

impl MonitoringEvent {
    /// Create a new event
    #[must_use]
    pub fn new(trace_id: TraceId, timestamp: Timestamp, location: Location, kind: EventKind) -> Self {
        Self {
            trace_id,
            timestamp,
            location,
            kind,
        }
    }

    /// Copy of this event with a different timestamp
    #[must_use]
    pub fn with_timestamp(&self, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }

    /// Copy of this event with a different location
    #[must_use]
    pub fn with_location(&self, location: Location) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for MonitoringEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {} in trace {}",
            self.kind.tag(),
            self.timestamp,
            self.trace_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind) -> MonitoringEvent {
        MonitoringEvent::new(
            TraceId::from_raw(1),
            Timestamp::from_raw(100),
            Location::observed("host", 1, 1),
            kind,
        )
    }

    #[test]
    fn test_candidate_name() {
        let entry = EventKind::CandidateEntry {
            name: "sc1".to_string(),
            starts_transaction: false,
            transaction_id: None,
        };
        assert_eq!(entry.candidate_name(), Some("sc1"));
        assert_eq!(
            EventKind::UseCaseStart {
                name: "uc".to_string()
            }
            .candidate_name(),
            None
        );
    }

    #[test]
    fn test_kind_predicates() {
        assert!(EventKind::TransactionStart {
            transaction_id: "tx1".to_string()
        }
        .is_transaction_demarcation());
        assert!(EventKind::EntityRead {
            entity: Entity::new("Order", "1")
        }
        .is_entity_access());
        assert!(!EventKind::UseCaseEnd {
            name: "uc".to_string()
        }
        .is_entity_access());
    }

    #[test]
    fn test_with_timestamp_keeps_rest() {
        let original = event(EventKind::UseCaseStart {
            name: "uc".to_string(),
        });
        let shifted = original.with_timestamp(Timestamp::from_raw(90));
        assert_eq!(shifted.timestamp, Timestamp::from_raw(90));
        assert_eq!(shifted.location, original.location);
        assert_eq!(shifted.kind, original.kind);
    }

    #[test]
    fn test_event_serde_round_trip() {
        let original = event(EventKind::TransactionAbort {
            transaction_id: "tx1".to_string(),
            explicit: false,
            cause: Some("deadlock".to_string()),
        });
        let json = serde_json::to_string(&original).unwrap();
        let decoded: MonitoringEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_event_display() {
        let e = event(EventKind::UseCaseStart {
            name: "uc".to_string(),
        });
        let s = e.to_string();
        assert!(s.contains("UseCaseStart"));
        assert!(s.contains("t=100"));
    }
}
