//! Traces: ordered event sequences sharing one id.

use crate::event::MonitoringEvent;
use serde::{Deserialize, Serialize};

/// Trace identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceId(u64);

impl TraceId {
    /// Create from raw value
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Get raw value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trace_{}", self.0)
    }
}

/// An ordered, append-only sequence of monitoring events
///
/// Timestamps are monotonic per trace by construction of the monitoring
/// infrastructure; this is not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    id: TraceId,
    events: Vec<MonitoringEvent>,
}

impl Trace {
    /// Create an empty trace
    #[must_use]
    pub const fn new(id: TraceId) -> Self {
        Self {
            id,
            events: Vec::new(),
        }
    }

    /// Create a trace from an existing event sequence
    #[must_use]
    pub fn from_events(id: TraceId, events: Vec<MonitoringEvent>) -> Self {
        Self { id, events }
    }

    /// Trace id
    #[must_use]
    pub const fn id(&self) -> TraceId {
        self.id
    }

    /// Append an event
    pub fn push(&mut self, event: MonitoringEvent) {
        self.events.push(event);
    }

    /// The recorded events, in order
    #[must_use]
    pub fn events(&self) -> &[MonitoringEvent] {
        &self.events
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the trace has no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the trace, yielding its events
    #[must_use]
    pub fn into_events(self) -> Vec<MonitoringEvent> {
        self.events
    }
}
