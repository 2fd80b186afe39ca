//! Timestamp and location rewriting.
//!
//! The rewriter carries one running time offset per trace. Every event is
//! emitted with its timestamp shifted by the current offset and its
//! location replaced by the context's current location. Whenever the
//! engine crosses a connection whose timing changed, the offset absorbs
//! the difference between the connection's new latency and the delta the
//! original trace observed for that crossing.

use crate::rewritten::{RewrittenTrace, TraceBuffer};
use parallax_core::{MonitoringEvent, TimeOffset, Trace, TraceId};
use parallax_model::{Connection, DeploymentModel};
use parallax_sim::{
    SimResult, SimulationContext, TraceSimulationListener, TraceSimulator, TransitionDirection,
};

/// When a transition makes the rewriter recompute its time offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteTrigger {
    /// The crossed connection is flagged modified
    #[default]
    ModifiedConnection,
    /// The context's current location differs from the one the event was
    /// recorded at
    LocationChange,
}

/// Listener emitting a timing-adjusted copy of the replayed trace
#[derive(Debug)]
pub struct LatencyRewriter {
    buffer: TraceBuffer,
    time_offset: TimeOffset,
    trigger: RewriteTrigger,
}

impl LatencyRewriter {
    /// Create a rewriter for one trace
    #[must_use]
    pub fn new(trace_id: TraceId) -> Self {
        Self {
            buffer: TraceBuffer::new(trace_id),
            time_offset: TimeOffset::zero(),
            trigger: RewriteTrigger::default(),
        }
    }

    /// Replace the offset-recomputation trigger
    #[must_use]
    pub fn with_trigger(mut self, trigger: RewriteTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Accumulated time offset
    #[must_use]
    pub const fn time_offset(&self) -> TimeOffset {
        self.time_offset
    }

    /// Finish the rewrite, yielding the output trace
    #[must_use]
    pub fn finish(self) -> RewrittenTrace {
        tracing::debug!(offset = %self.time_offset, "latency rewrite finished");
        self.buffer.finish()
    }

    fn triggered(&self, end_event: &MonitoringEvent, connection: &Connection, context: &SimulationContext) -> bool {
        match self.trigger {
            RewriteTrigger::ModifiedConnection => connection.is_modified(),
            RewriteTrigger::LocationChange => {
                context.current_location() != Some(&end_event.location)
            }
        }
    }
}

impl TraceSimulationListener for LatencyRewriter {
    fn after_transition(
        &mut self,
        _direction: TransitionDirection,
        start_event: &MonitoringEvent,
        end_event: &MonitoringEvent,
        connection: &Connection,
        context: &SimulationContext,
    ) {
        if self.triggered(end_event, connection, context) {
            let observed_delta = end_event.timestamp - start_event.timestamp;
            self.time_offset += connection.latency() - observed_delta;
        }
    }

    fn on_event(&mut self, event: &MonitoringEvent, context: &SimulationContext) {
        let location = context
            .current_location()
            .cloned()
            .unwrap_or_else(|| event.location.clone());
        self.buffer.record(
            event
                .with_timestamp(event.timestamp + self.time_offset)
                .with_location(location),
        );
    }
}

/// Replay a trace against a model and rewrite its timing in one step
///
/// # Errors
///
/// Returns the replay error when the trace cannot be processed against
/// the model
pub fn rewrite_latency(model: &DeploymentModel, trace: &Trace) -> SimResult<RewrittenTrace> {
    let simulator = TraceSimulator::new(model);
    let mut rewriter = LatencyRewriter::new(trace.id());
    simulator.process_trace(trace, &mut [&mut rewriter])?;
    Ok(rewriter.finish())
}
