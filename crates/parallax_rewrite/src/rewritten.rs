//! Rewritten traces with their back-references to the input.

use parallax_core::{MonitoringEvent, Trace, TraceId};
use serde::{Deserialize, Serialize};

/// A rewritten trace plus the per-event mapping back to the input trace.
///
/// The i-th rewritten event corresponds to the input event at index
/// `origin()[i]`. Rewriters never insert or delete events, so the mapping
/// lets consumers relate rewritten findings back to original events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewrittenTrace {
    trace: Trace,
    origin: Vec<usize>,
}

impl RewrittenTrace {
    /// The rewritten trace
    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Input-event index for each rewritten event, in order
    #[must_use]
    pub fn origin(&self) -> &[usize] {
        &self.origin
    }

    /// Number of rewritten events
    #[must_use]
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// Whether the rewritten trace has no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Consume, yielding only the rewritten trace
    #[must_use]
    pub fn into_trace(self) -> Trace {
        self.trace
    }

    /// Consume, yielding the trace and the origin mapping
    #[must_use]
    pub fn into_parts(self) -> (Trace, Vec<usize>) {
        (self.trace, self.origin)
    }
}

/// Ordered output buffer shared by the rewriters.
///
/// `record` is called exactly once per input event, so the origin mapping
/// is maintained here and nowhere else.
#[derive(Debug)]
pub(crate) struct TraceBuffer {
    trace: Trace,
    origin: Vec<usize>,
    next_input: usize,
}

impl TraceBuffer {
    pub(crate) fn new(id: TraceId) -> Self {
        Self {
            trace: Trace::new(id),
            origin: Vec::new(),
            next_input: 0,
        }
    }

    pub(crate) fn record(&mut self, event: MonitoringEvent) {
        self.origin.push(self.next_input);
        self.next_input += 1;
        self.trace.push(event);
    }

    pub(crate) fn finish(self) -> RewrittenTrace {
        RewrittenTrace {
            trace: self.trace,
            origin: self.origin,
        }
    }
}
