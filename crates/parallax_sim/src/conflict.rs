//! Consistency findings produced by the conflict-tracking variant.
//!
//! Conflicting reads and writes are analysis output, not errors: they never
//! abort a replay.

use crate::context::SimulationContext;
use crate::listener::TraceSimulationListener;
use parallax_core::MonitoringEvent;
use serde::{Deserialize, Serialize};

/// Kind of detected conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A read observed another transaction's pending write
    ReadWrite,
    /// A write collided with another transaction's pending write
    WriteWrite,
}

/// A detected conflict, referencing the offending event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyFinding {
    /// Conflict kind
    pub kind: ConflictKind,
    /// The read or write event that conflicted
    pub event: MonitoringEvent,
}

/// Listener accumulating consistency findings
#[derive(Debug, Default)]
pub struct ConflictCollector {
    findings: Vec<ConsistencyFinding>,
}

impl ConflictCollector {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings collected so far, in detection order
    #[must_use]
    pub fn findings(&self) -> &[ConsistencyFinding] {
        &self.findings
    }

    /// Number of findings
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Whether no conflicts were detected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Consume the collector, yielding its findings
    #[must_use]
    pub fn into_findings(self) -> Vec<ConsistencyFinding> {
        self.findings
    }
}

impl TraceSimulationListener for ConflictCollector {
    fn on_conflict(&mut self, finding: &ConsistencyFinding, _context: &SimulationContext) {
        self.findings.push(finding.clone());
    }
}
