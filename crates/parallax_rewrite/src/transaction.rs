//! Transaction marker rewriting.
//!
//! Rewrites only candidate-entry events: when the replay opens a new
//! transaction at an entry where the original run did not, the entry gains
//! transaction-start metadata; when the replay opens none where the
//! original did, the metadata is stripped; when both open one under a
//! different id, the id is substituted. All other events are copied
//! unchanged.

use crate::rewritten::{RewrittenTrace, TraceBuffer};
use parallax_core::{EventKind, MonitoringEvent, Trace, TraceId};
use parallax_model::DeploymentModel;
use parallax_sim::{
    SimResult, SimulationContext, TraceSimulationListener, TraceSimulator, TxHandle,
};

/// Listener emitting a copy of the trace with adjusted transaction markers
#[derive(Debug)]
pub struct TransactionContextRewriter {
    buffer: TraceBuffer,
    // Id of the transaction the engine opened at the entry currently being
    // processed, if any. Set between the engine's transaction decision and
    // the entry's emission.
    pending_entry_tx: Option<String>,
}

impl TransactionContextRewriter {
    /// Create a rewriter for one trace
    #[must_use]
    pub fn new(trace_id: TraceId) -> Self {
        Self {
            buffer: TraceBuffer::new(trace_id),
            pending_entry_tx: None,
        }
    }

    /// Finish the rewrite, yielding the output trace
    #[must_use]
    pub fn finish(self) -> RewrittenTrace {
        self.buffer.finish()
    }
}

impl TraceSimulationListener for TransactionContextRewriter {
    fn on_transaction_started(
        &mut self,
        transaction: TxHandle,
        event: &MonitoringEvent,
        context: &SimulationContext,
    ) {
        if matches!(event.kind, EventKind::CandidateEntry { .. }) {
            self.pending_entry_tx = Some(context.transaction(transaction).id().to_string());
        }
    }

    fn on_event(&mut self, event: &MonitoringEvent, _context: &SimulationContext) {
        match &event.kind {
            EventKind::CandidateEntry { name, .. } => {
                let transaction_id = self.pending_entry_tx.take();
                let mut rewritten = event.clone();
                rewritten.kind = EventKind::CandidateEntry {
                    name: name.clone(),
                    starts_transaction: transaction_id.is_some(),
                    transaction_id,
                };
                self.buffer.record(rewritten);
            }
            _ => self.buffer.record(event.clone()),
        }
    }
}

/// Replay a trace against a model and rewrite its transaction markers in
/// one step
///
/// # Errors
///
/// Returns the replay error when the trace cannot be processed against
/// the model
pub fn rewrite_transaction_context(
    model: &DeploymentModel,
    trace: &Trace,
) -> SimResult<RewrittenTrace> {
    let simulator = TraceSimulator::new(model);
    let mut rewriter = TransactionContextRewriter::new(trace.id());
    simulator.process_trace(trace, &mut [&mut rewriter])?;
    Ok(rewriter.finish())
}
