//! The trace simulation engine.
//!
//! One forward pass over a trace's events with one-event lookahead to pair
//! invocation/entry and exit/return. The engine maintains the simulation
//! context, resolves the connection used for every call and return, runs
//! the transaction decision table on each entry, and (in its
//! conflict-tracking variant) maintains the pending-write map. Listeners
//! are notified synchronously, in event order.

use crate::conflict::{ConflictKind, ConsistencyFinding};
use crate::context::SimulationContext;
use crate::error::{SimResult, SimulationError};
use crate::listener::{TraceSimulationListener, TransitionDirection};
use crate::machine::{decide, TransactionDecision};
use crate::transaction::{Demarcation, TransactionOutcome, TxHandle};
use parallax_core::{Entity, EntityKey, EventKind, EventStream, Location, MonitoringEvent, Trace, TraceId};
use parallax_model::{DeploymentModel, TransactionPropagation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// When the engine invents a synthetic location on a call transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntheticLocationRule {
    /// Allocate when the remote connection is flagged modified and the
    /// recorded entry location is not already synthetic
    ModifiedConnection,
    /// Allocate when the recorded entry location did not actually change
    /// although the connection is remote
    LocationMismatch,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Synthetic-location trigger on call transitions
    pub synthetic_location_rule: SyntheticLocationRule,
    /// Whether the engine tracks entity conflicts
    pub conflict_tracking: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            synthetic_location_rule: SyntheticLocationRule::ModifiedConnection,
            conflict_tracking: false,
        }
    }
}

/// Per-trace replay outcome counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Trace that was replayed
    pub trace_id: TraceId,
    /// Number of events processed
    pub events_processed: usize,
    /// New transaction objects that became current (including subordinates)
    pub transactions_opened: usize,
    /// Transactions completed with a commit outcome
    pub transactions_committed: usize,
    /// Transactions completed with an abort outcome
    pub transactions_aborted: usize,
    /// Conflicts detected by the conflict-tracking variant
    pub conflicts: usize,
    /// Entity keys whose writes became permanent during the replay
    pub committed_writes: BTreeSet<EntityKey>,
}

impl TraceSummary {
    fn new(trace_id: TraceId) -> Self {
        Self {
            trace_id,
            events_processed: 0,
            transactions_opened: 0,
            transactions_committed: 0,
            transactions_aborted: 0,
            conflicts: 0,
            committed_writes: BTreeSet::new(),
        }
    }
}

/// Trace simulation engine bound to one deployment model.
///
/// The engine itself is stateless between traces; each `process_trace`
/// call owns a fresh context, so one engine may replay many traces, and
/// independent engines may run in parallel over the same shared model.
#[derive(Debug)]
pub struct TraceSimulator<'m> {
    model: &'m DeploymentModel,
    config: SimulatorConfig,
}

impl<'m> TraceSimulator<'m> {
    /// Create an engine with the default configuration
    #[must_use]
    pub fn new(model: &'m DeploymentModel) -> Self {
        Self {
            model,
            config: SimulatorConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable the conflict-tracking variant
    #[must_use]
    pub fn with_conflict_tracking(mut self, enabled: bool) -> Self {
        self.config.conflict_tracking = enabled;
        self
    }

    /// Engine configuration
    #[must_use]
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Replay one trace, driving the given listeners
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] carrying the offending event when the
    /// trace cannot be replayed against the model
    pub fn process_trace(
        &self,
        trace: &Trace,
        listeners: &mut [&mut dyn TraceSimulationListener],
    ) -> SimResult<TraceSummary> {
        tracing::debug!(trace = %trace.id(), events = trace.len(), "replaying trace");
        let mut replay = Replay {
            model: self.model,
            config: self.config,
            context: SimulationContext::new(),
            listeners,
            next_synthetic_location: 0,
            next_synthetic_tx_id: 1,
            pending_writes: HashMap::new(),
            summary: TraceSummary::new(trace.id()),
        };
        replay.run(trace)?;
        Ok(replay.summary)
    }

    /// Replay a batch of traces.
    ///
    /// A fatal error in one trace does not affect the others; the result
    /// vector is index-aligned with the input.
    pub fn process_batch(
        &self,
        traces: &[Trace],
        listeners: &mut [&mut dyn TraceSimulationListener],
    ) -> Vec<SimResult<TraceSummary>> {
        traces
            .iter()
            .map(|trace| {
                let result = self.process_trace(trace, &mut *listeners);
                if let Err(error) = &result {
                    tracing::warn!(trace = %trace.id(), %error, "trace replay failed");
                }
                result
            })
            .collect()
    }
}

/// State of one replay in progress
struct Replay<'m, 'a, 'b> {
    model: &'m DeploymentModel,
    config: SimulatorConfig,
    context: SimulationContext,
    listeners: &'a mut [&'b mut dyn TraceSimulationListener],
    next_synthetic_location: u64,
    next_synthetic_tx_id: u64,
    pending_writes: HashMap<EntityKey, TxHandle>,
    summary: TraceSummary,
}

impl Replay<'_, '_, '_> {
    fn notify<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn TraceSimulationListener, &SimulationContext),
    {
        let context = &self.context;
        for listener in self.listeners.iter_mut() {
            f(&mut **listener, context);
        }
    }

    fn run(&mut self, trace: &Trace) -> SimResult<()> {
        let mut stream = EventStream::new(trace);
        while let Some(event) = stream.next() {
            self.summary.events_processed += 1;
            match &event.kind {
                EventKind::UseCaseStart { name } => self.handle_use_case_start(event, name)?,
                EventKind::UseCaseEnd { .. } => self.handle_use_case_end(event)?,
                EventKind::CandidateInvocation { name } => {
                    let entry = stream.next().ok_or_else(|| {
                        SimulationError::MalformedEventPairing {
                            expected: format!("entry of '{name}'"),
                            event: event.clone(),
                        }
                    })?;
                    self.summary.events_processed += 1;
                    self.handle_call(event, entry, name)?;
                }
                EventKind::CandidateEntry { .. } => {
                    return Err(SimulationError::MalformedEventPairing {
                        expected: "an invocation preceding this entry".to_string(),
                        event: event.clone(),
                    });
                }
                EventKind::CandidateExit { name } => {
                    let ret = stream.next().ok_or_else(|| {
                        SimulationError::MalformedEventPairing {
                            expected: format!("return of '{name}'"),
                            event: event.clone(),
                        }
                    })?;
                    self.summary.events_processed += 1;
                    self.handle_return(event, ret, name)?;
                }
                EventKind::CandidateReturn { .. } => {
                    return Err(SimulationError::MalformedEventPairing {
                        expected: "an exit preceding this return".to_string(),
                        event: event.clone(),
                    });
                }
                EventKind::TransactionStart { transaction_id } => {
                    self.handle_explicit_start(event, transaction_id)?;
                }
                EventKind::TransactionCommit { .. } => self.handle_explicit_commit(event)?,
                EventKind::TransactionAbort { explicit, .. } => {
                    if *explicit {
                        self.handle_explicit_abort(event)?;
                    } else {
                        self.handle_implicit_abort(event);
                    }
                }
                EventKind::EntityRead { entity } => self.handle_entity_read(event, entity)?,
                EventKind::EntityWrite { entity } => self.handle_entity_write(event, entity)?,
            }
        }
        Ok(())
    }

    fn handle_use_case_start(&mut self, event: &MonitoringEvent, name: &str) -> SimResult<()> {
        if self.context.current_component().is_some() {
            return Err(SimulationError::UnexpectedEvent {
                reason: "use case started while another use case is active".to_string(),
                event: event.clone(),
            });
        }
        let component = self.model.component_for_use_case(name).ok_or_else(|| {
            SimulationError::UnmappedUseCase {
                name: name.to_string(),
                event: event.clone(),
            }
        })?;
        self.context
            .set_current_component(Some(component.name().to_string()));
        self.context.set_current_location(Some(event.location.clone()));
        self.context.set_current_candidate(None);
        self.context.set_current_transaction(None);
        self.notify(|l, ctx| l.on_use_case_start(event, ctx));
        self.notify(|l, ctx| l.on_event(event, ctx));
        Ok(())
    }

    fn handle_use_case_end(&mut self, event: &MonitoringEvent) -> SimResult<()> {
        if self.context.stack_depth() > 0 {
            return Err(SimulationError::UnexpectedEvent {
                reason: "use case ended with unfinished candidate invocations".to_string(),
                event: event.clone(),
            });
        }
        self.notify(|l, ctx| l.on_use_case_end(event, ctx));
        self.notify(|l, ctx| l.on_event(event, ctx));
        self.context.clear_current();
        Ok(())
    }

    fn handle_call(
        &mut self,
        invocation: &MonitoringEvent,
        entry: &MonitoringEvent,
        name: &str,
    ) -> SimResult<()> {
        let declared_tx_id = match &entry.kind {
            EventKind::CandidateEntry {
                name: entry_name,
                transaction_id,
                ..
            } if entry_name == name => transaction_id.clone(),
            _ => {
                return Err(SimulationError::MalformedEventPairing {
                    expected: format!("entry of '{name}'"),
                    event: entry.clone(),
                });
            }
        };
        let source_component = match self.context.current_component() {
            Some(component) => component.to_string(),
            None => {
                return Err(SimulationError::UnexpectedEvent {
                    reason: "service candidate invoked outside a use case".to_string(),
                    event: invocation.clone(),
                });
            }
        };
        let candidate = self.model.service_candidate(name).ok_or_else(|| {
            SimulationError::UnmappedServiceCandidate {
                name: name.to_string(),
                event: invocation.clone(),
            }
        })?;
        let target_component = self
            .model
            .component_for_service_candidate(name)
            .ok_or_else(|| SimulationError::UnmappedServiceCandidate {
                name: name.to_string(),
                event: invocation.clone(),
            })?;
        let connection = self
            .model
            .connection(&source_component, target_component.name())
            .ok_or_else(|| SimulationError::MissingConnection {
                from: source_component.clone(),
                to: target_component.name().to_string(),
                event: invocation.clone(),
            })?;

        self.notify(|l, ctx| l.on_candidate_invocation(invocation, ctx));
        self.notify(|l, ctx| l.on_event(invocation, ctx));

        self.context.push_frame();
        self.notify(|l, ctx| {
            l.before_transition(TransitionDirection::Call, invocation, entry, &connection, ctx);
        });

        let current_location = self.context.current_location().cloned().ok_or_else(|| {
            SimulationError::UnexpectedEvent {
                reason: "no active location for a candidate invocation".to_string(),
                event: invocation.clone(),
            }
        })?;
        let target_location = if connection.is_remote() {
            let allocate = match self.config.synthetic_location_rule {
                SyntheticLocationRule::ModifiedConnection => {
                    connection.is_modified() && !entry.location.is_synthetic()
                }
                SyntheticLocationRule::LocationMismatch => entry.location == current_location,
            };
            if allocate {
                let location = Location::synthetic(self.next_synthetic_location);
                self.next_synthetic_location += 1;
                location
            } else {
                if entry.location == current_location {
                    return Err(SimulationError::InvalidLocationTransition {
                        reason: "remote connection must change location".to_string(),
                        event: entry.clone(),
                    });
                }
                entry.location.clone()
            }
        } else {
            if !connection.is_modified() && entry.location != current_location {
                return Err(SimulationError::InvalidLocationTransition {
                    reason: "local connection must not change location".to_string(),
                    event: entry.clone(),
                });
            }
            current_location
        };

        self.context
            .set_current_component(Some(target_component.name().to_string()));
        self.context
            .set_current_location(Some(target_location.clone()));
        self.context.set_current_candidate(Some(name.to_string()));

        let usable = self.context.current_transaction().is_some()
            && connection.propagation() != TransactionPropagation::None;
        let decision = decide(candidate.transaction_behavior(), usable).map_err(|violation| {
            SimulationError::InvalidTransactionState {
                reason: violation.to_string(),
                event: entry.clone(),
            }
        })?;
        match decision {
            TransactionDecision::Suspend => self.context.set_current_transaction(None),
            TransactionDecision::Keep => {
                if let Some(current) = self.context.current_transaction() {
                    match connection.propagation() {
                        TransactionPropagation::Identical => {}
                        TransactionPropagation::Subordinate => {
                            let subordinate = self
                                .context
                                .arena_mut()
                                .create_subordinate(current, target_location.clone());
                            self.context.set_current_transaction(Some(subordinate));
                            self.summary.transactions_opened += 1;
                            self.notify(|l, ctx| l.on_transaction_started(subordinate, entry, ctx));
                        }
                        TransactionPropagation::None => {
                            self.context.set_current_transaction(None);
                        }
                    }
                }
            }
            TransactionDecision::CreateNew => {
                let id = declared_tx_id.unwrap_or_else(|| {
                    let id = format!("sim-{}", self.next_synthetic_tx_id);
                    self.next_synthetic_tx_id += 1;
                    id
                });
                let transaction = self.context.arena_mut().create_top_level(
                    id,
                    target_location,
                    Demarcation::Implicit,
                );
                self.context.set_current_transaction(Some(transaction));
                self.summary.transactions_opened += 1;
                self.notify(|l, ctx| l.on_transaction_started(transaction, entry, ctx));
            }
        }

        self.notify(|l, ctx| {
            l.after_transition(TransitionDirection::Call, invocation, entry, &connection, ctx);
        });
        self.notify(|l, ctx| l.on_candidate_entry(entry, ctx));
        self.notify(|l, ctx| l.on_event(entry, ctx));
        Ok(())
    }

    fn handle_return(
        &mut self,
        exit: &MonitoringEvent,
        ret: &MonitoringEvent,
        name: &str,
    ) -> SimResult<()> {
        match &ret.kind {
            EventKind::CandidateReturn { name: return_name } if return_name == name => {}
            _ => {
                return Err(SimulationError::MalformedEventPairing {
                    expected: format!("return of '{name}'"),
                    event: ret.clone(),
                });
            }
        }
        if self.context.current_candidate() != Some(name) {
            return Err(SimulationError::UnexpectedEvent {
                reason: format!("exit of '{name}' does not match the current candidate"),
                event: exit.clone(),
            });
        }
        let frame = match self.context.top_frame() {
            Some(frame) => frame.clone(),
            None => {
                return Err(SimulationError::UnexpectedEvent {
                    reason: "exit without a matching invocation".to_string(),
                    event: exit.clone(),
                });
            }
        };
        let source_component = self
            .context
            .current_component()
            .map(str::to_string)
            .ok_or_else(|| SimulationError::UnexpectedEvent {
                reason: "no active component for a candidate exit".to_string(),
                event: exit.clone(),
            })?;
        let caller_component =
            frame
                .component
                .clone()
                .ok_or_else(|| SimulationError::UnexpectedEvent {
                    reason: "saved frame has no component".to_string(),
                    event: exit.clone(),
                })?;
        let connection = self
            .model
            .connection(&source_component, &caller_component)
            .ok_or_else(|| SimulationError::MissingConnection {
                from: source_component,
                to: caller_component,
                event: exit.clone(),
            })?;

        self.notify(|l, ctx| l.on_candidate_exit(exit, ctx));
        self.notify(|l, ctx| l.on_event(exit, ctx));
        self.notify(|l, ctx| {
            l.before_transition(TransitionDirection::Return, exit, ret, &connection, ctx);
        });

        // A top-level transaction opened implicitly during this call is
        // closed here; subordinates complete with their root.
        if let Some(current) = self.context.current_transaction() {
            let opened_here = {
                let transaction = self.context.transaction(current);
                transaction.is_top_level()
                    && transaction.demarcation() == Demarcation::Implicit
                    && frame.transaction != Some(current)
            };
            if opened_here {
                let outcome = if self.context.arena().is_abort_only(current) {
                    TransactionOutcome::Aborted
                } else {
                    TransactionOutcome::Committed
                };
                self.complete_transaction(current, outcome, exit);
            }
        }

        let current_location = self.context.current_location().cloned().ok_or_else(|| {
            SimulationError::UnexpectedEvent {
                reason: "no active location for a candidate exit".to_string(),
                event: exit.clone(),
            }
        })?;
        let caller_location =
            frame
                .location
                .clone()
                .ok_or_else(|| SimulationError::UnexpectedEvent {
                    reason: "saved frame has no location".to_string(),
                    event: exit.clone(),
                })?;
        if connection.is_remote() {
            if !connection.is_modified() && caller_location == current_location {
                return Err(SimulationError::InvalidLocationTransition {
                    reason: "remote connection must change location".to_string(),
                    event: ret.clone(),
                });
            }
        } else if !connection.is_modified() && caller_location != current_location {
            return Err(SimulationError::InvalidLocationTransition {
                reason: "local connection must not change location".to_string(),
                event: ret.clone(),
            });
        }

        self.context.pop_frame();
        self.notify(|l, ctx| {
            l.after_transition(TransitionDirection::Return, exit, ret, &connection, ctx);
        });
        self.notify(|l, ctx| l.on_candidate_return(ret, ctx));
        self.notify(|l, ctx| l.on_event(ret, ctx));
        Ok(())
    }

    fn handle_explicit_start(&mut self, event: &MonitoringEvent, id: &str) -> SimResult<()> {
        if self.context.current_transaction().is_some() {
            return Err(SimulationError::InvalidTransactionState {
                reason: "explicit transaction start while a transaction is active".to_string(),
                event: event.clone(),
            });
        }
        let location = self.context.current_location().cloned().ok_or_else(|| {
            SimulationError::UnexpectedEvent {
                reason: "transaction started outside a use case".to_string(),
                event: event.clone(),
            }
        })?;
        let transaction =
            self.context
                .arena_mut()
                .create_top_level(id, location, Demarcation::Explicit);
        self.context.set_current_transaction(Some(transaction));
        self.summary.transactions_opened += 1;
        self.notify(|l, ctx| l.on_transaction_started(transaction, event, ctx));
        self.notify(|l, ctx| l.on_event(event, ctx));
        Ok(())
    }

    fn handle_explicit_commit(&mut self, event: &MonitoringEvent) -> SimResult<()> {
        let current = self.context.current_transaction().ok_or_else(|| {
            SimulationError::InvalidTransactionState {
                reason: "explicit commit without an active transaction".to_string(),
                event: event.clone(),
            }
        })?;
        {
            let transaction = self.context.transaction(current);
            if !transaction.is_top_level() {
                return Err(SimulationError::InvalidTransactionState {
                    reason: "explicit commit of a subordinate transaction".to_string(),
                    event: event.clone(),
                });
            }
            if transaction.demarcation() != Demarcation::Explicit {
                return Err(SimulationError::InvalidTransactionState {
                    reason: "explicit commit of an implicitly demarcated transaction".to_string(),
                    event: event.clone(),
                });
            }
        }
        let outcome = if self.context.arena().is_abort_only(current) {
            TransactionOutcome::Aborted
        } else {
            TransactionOutcome::Committed
        };
        self.complete_transaction(current, outcome, event);
        self.context.set_current_transaction(None);
        self.notify(|l, ctx| l.on_event(event, ctx));
        Ok(())
    }

    fn handle_explicit_abort(&mut self, event: &MonitoringEvent) -> SimResult<()> {
        if let Some(current) = self.context.current_transaction() {
            if !self.context.transaction(current).is_top_level() {
                return Err(SimulationError::InvalidTransactionState {
                    reason: "explicit abort of a subordinate transaction".to_string(),
                    event: event.clone(),
                });
            }
            self.complete_transaction(current, TransactionOutcome::Aborted, event);
            self.context.set_current_transaction(None);
        }
        self.notify(|l, ctx| l.on_event(event, ctx));
        Ok(())
    }

    fn handle_implicit_abort(&mut self, event: &MonitoringEvent) {
        if let Some(current) = self.context.current_transaction() {
            self.context.arena_mut().mark_abort_only(current);
        }
        self.notify(|l, ctx| l.on_event(event, ctx));
    }

    fn handle_entity_read(&mut self, event: &MonitoringEvent, entity: &Entity) -> SimResult<()> {
        self.resolve_data_store(event, entity)?;
        if self.config.conflict_tracking {
            let key = entity.key();
            if let Some(writer) = self.pending_writes.get(&key).copied() {
                if !self.same_transaction(writer) {
                    let finding = ConsistencyFinding {
                        kind: ConflictKind::ReadWrite,
                        event: event.clone(),
                    };
                    self.summary.conflicts += 1;
                    self.notify(|l, ctx| l.on_conflict(&finding, ctx));
                }
            }
        }
        self.notify(|l, ctx| l.on_entity_read(event, entity, ctx));
        self.notify(|l, ctx| l.on_event(event, ctx));
        Ok(())
    }

    fn handle_entity_write(&mut self, event: &MonitoringEvent, entity: &Entity) -> SimResult<()> {
        self.resolve_data_store(event, entity)?;
        if self.config.conflict_tracking {
            let key = entity.key();
            let conflicting_writer = self
                .pending_writes
                .get(&key)
                .copied()
                .filter(|writer| !self.same_transaction(*writer));
            if conflicting_writer.is_some() {
                let finding = ConsistencyFinding {
                    kind: ConflictKind::WriteWrite,
                    event: event.clone(),
                };
                self.summary.conflicts += 1;
                self.notify(|l, ctx| l.on_conflict(&finding, ctx));
                if let Some(current) = self.context.current_transaction() {
                    self.context.arena_mut().mark_abort_only(current);
                }
            } else if let Some(current) = self.context.current_transaction() {
                self.pending_writes.insert(key, current);
            } else {
                // No active transaction: the write commits immediately.
                self.summary.committed_writes.insert(key);
                self.notify(|l, ctx| l.on_write_auto_committed(event, entity, ctx));
            }
        }
        self.notify(|l, ctx| l.on_entity_write(event, entity, ctx));
        self.notify(|l, ctx| l.on_event(event, ctx));
        Ok(())
    }

    fn resolve_data_store(&self, event: &MonitoringEvent, entity: &Entity) -> SimResult<()> {
        if self
            .model
            .data_store_for_entity_type(&entity.type_name)
            .is_none()
        {
            return Err(SimulationError::UnmappedEntityType {
                name: entity.type_name.clone(),
                event: event.clone(),
            });
        }
        Ok(())
    }

    /// Whether the current context is in the same transaction tree as
    /// `other`. With no current transaction there is no shared tree.
    fn same_transaction(&self, other: TxHandle) -> bool {
        self.context
            .current_transaction()
            .is_some_and(|current| self.context.root_of(current) == self.context.root_of(other))
    }

    /// Complete a transaction tree and resolve its pending writes.
    fn complete_transaction(
        &mut self,
        handle: TxHandle,
        outcome: TransactionOutcome,
        event: &MonitoringEvent,
    ) {
        let completed = self.context.arena_mut().complete(handle, outcome);
        let root = completed[0];
        tracing::debug!(
            transaction = self.context.transaction(root).id(),
            ?outcome,
            subordinates = completed.len() - 1,
            "transaction completed"
        );

        let pending = std::mem::take(&mut self.pending_writes);
        for (key, writer) in pending {
            if self.context.root_of(writer) == root {
                if outcome == TransactionOutcome::Committed {
                    self.summary.committed_writes.insert(key);
                }
            } else {
                self.pending_writes.insert(key, writer);
            }
        }

        for transaction in completed {
            match outcome {
                TransactionOutcome::Committed => {
                    self.summary.transactions_committed += 1;
                    self.notify(|l, ctx| l.on_transaction_committed(transaction, event, ctx));
                }
                TransactionOutcome::Aborted => {
                    self.summary.transactions_aborted += 1;
                    self.notify(|l, ctx| l.on_transaction_aborted(transaction, event, ctx));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_core::{TimeOffset, Timestamp};
    use parallax_model::{DeploymentModelBuilder, TransactionBehavior};

    fn loc1() -> Location {
        Location::observed("host-a", 10, 1)
    }

    fn loc2() -> Location {
        Location::observed("host-b", 20, 1)
    }

    fn ev(t: i64, location: Location, kind: EventKind) -> MonitoringEvent {
        MonitoringEvent::new(TraceId::from_raw(1), Timestamp::from_raw(t), location, kind)
    }

    fn uc_start(t: i64) -> MonitoringEvent {
        ev(t, loc1(), EventKind::UseCaseStart { name: "uc".to_string() })
    }

    fn uc_end(t: i64) -> MonitoringEvent {
        ev(t, loc1(), EventKind::UseCaseEnd { name: "uc".to_string() })
    }

    fn invocation(t: i64, name: &str) -> MonitoringEvent {
        ev(t, loc1(), EventKind::CandidateInvocation { name: name.to_string() })
    }

    fn entry(t: i64, name: &str, location: Location) -> MonitoringEvent {
        ev(
            t,
            location,
            EventKind::CandidateEntry {
                name: name.to_string(),
                starts_transaction: false,
                transaction_id: None,
            },
        )
    }

    fn exit(t: i64, name: &str, location: Location) -> MonitoringEvent {
        ev(t, location, EventKind::CandidateExit { name: name.to_string() })
    }

    fn ret(t: i64, name: &str) -> MonitoringEvent {
        ev(t, loc1(), EventKind::CandidateReturn { name: name.to_string() })
    }

    fn tx_start(t: i64, id: &str) -> MonitoringEvent {
        ev(t, loc1(), EventKind::TransactionStart { transaction_id: id.to_string() })
    }

    fn tx_commit(t: i64, id: &str) -> MonitoringEvent {
        ev(t, loc1(), EventKind::TransactionCommit { transaction_id: id.to_string() })
    }

    fn tx_abort(t: i64, id: &str, explicit: bool) -> MonitoringEvent {
        ev(
            t,
            loc1(),
            EventKind::TransactionAbort {
                transaction_id: id.to_string(),
                explicit,
                cause: None,
            },
        )
    }

    fn read(t: i64, location: Location, entity: Entity) -> MonitoringEvent {
        ev(t, location, EventKind::EntityRead { entity })
    }

    fn write(t: i64, location: Location, entity: Entity) -> MonitoringEvent {
        ev(t, location, EventKind::EntityWrite { entity })
    }

    fn trace(events: Vec<MonitoringEvent>) -> Trace {
        Trace::from_events(TraceId::from_raw(1), events)
    }

    fn builder_with_candidate(behavior: TransactionBehavior) -> DeploymentModelBuilder {
        DeploymentModelBuilder::new()
            .component("frontend")
            .component("backend")
            .data_store("db")
            .use_case("uc", "frontend")
            .service_candidate_with_behavior("sc1", "backend", behavior)
            .entity_type("Order", "db")
    }

    fn local_model(behavior: TransactionBehavior) -> DeploymentModel {
        builder_with_candidate(behavior)
            .local_connection("frontend", "backend")
            .build()
            .unwrap()
    }

    fn remote_model(
        behavior: TransactionBehavior,
        propagation: TransactionPropagation,
    ) -> DeploymentModel {
        builder_with_candidate(behavior)
            .remote_connection("frontend", "backend", TimeOffset::from_raw(10), propagation)
            .build()
            .unwrap()
    }

    /// Records enough of each callback to assert on ordering and context.
    #[derive(Default)]
    struct Recorder {
        events: Vec<&'static str>,
        started: Vec<String>,
        committed: Vec<String>,
        aborted: Vec<String>,
        entry_transactions: Vec<Option<String>>,
        entry_locations: Vec<Location>,
        entries: usize,
        exits: usize,
        end_stack_depth: Option<usize>,
    }

    impl TraceSimulationListener for Recorder {
        fn on_event(&mut self, event: &MonitoringEvent, _context: &SimulationContext) {
            self.events.push(event.kind.tag());
        }

        fn on_candidate_entry(&mut self, _event: &MonitoringEvent, context: &SimulationContext) {
            self.entries += 1;
            self.entry_transactions.push(
                context
                    .current_transaction()
                    .map(|tx| context.transaction(tx).id().to_string()),
            );
            self.entry_locations
                .push(context.current_location().unwrap().clone());
        }

        fn on_candidate_exit(&mut self, _event: &MonitoringEvent, _context: &SimulationContext) {
            self.exits += 1;
        }

        fn on_use_case_end(&mut self, _event: &MonitoringEvent, context: &SimulationContext) {
            self.end_stack_depth = Some(context.stack_depth());
        }

        fn on_transaction_started(
            &mut self,
            transaction: TxHandle,
            _event: &MonitoringEvent,
            context: &SimulationContext,
        ) {
            self.started
                .push(context.transaction(transaction).id().to_string());
        }

        fn on_transaction_committed(
            &mut self,
            transaction: TxHandle,
            _event: &MonitoringEvent,
            context: &SimulationContext,
        ) {
            self.committed
                .push(context.transaction(transaction).id().to_string());
        }

        fn on_transaction_aborted(
            &mut self,
            transaction: TxHandle,
            _event: &MonitoringEvent,
            context: &SimulationContext,
        ) {
            self.aborted
                .push(context.transaction(transaction).id().to_string());
        }
    }

    fn simple_call_trace(entry_loc: Location, exit_loc: Location) -> Trace {
        trace(vec![
            uc_start(100),
            invocation(200, "sc1"),
            entry(210, "sc1", entry_loc),
            exit(400, "sc1", exit_loc),
            ret(410, "sc1"),
            uc_end(500),
        ])
    }

    #[test]
    fn test_replay_simple_use_case() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        let summary = simulator
            .process_trace(&trace(vec![uc_start(100), uc_end(200)]), &mut listeners)
            .unwrap();
        assert_eq!(summary.events_processed, 2);
        assert_eq!(recorder.events, vec!["UseCaseStart", "UseCaseEnd"]);
    }

    #[test]
    fn test_local_call_round_trip() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        let summary = simulator
            .process_trace(&simple_call_trace(loc1(), loc1()), &mut listeners)
            .unwrap();
        assert_eq!(summary.events_processed, 6);
        assert_eq!(recorder.entries, recorder.exits);
        assert_eq!(recorder.end_stack_depth, Some(0));
        assert_eq!(recorder.entry_locations, vec![loc1()]);
        assert_eq!(
            recorder.events,
            vec![
                "UseCaseStart",
                "CandidateInvocation",
                "CandidateEntry",
                "CandidateExit",
                "CandidateReturn",
                "UseCaseEnd",
            ]
        );
    }

    #[test]
    fn test_remote_call_changes_location() {
        let model = remote_model(TransactionBehavior::Supported, TransactionPropagation::Identical);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        simulator
            .process_trace(&simple_call_trace(loc2(), loc2()), &mut listeners)
            .unwrap();
        assert_eq!(recorder.entry_locations, vec![loc2()]);
    }

    #[test]
    fn test_remote_call_without_location_change_fails() {
        let model = remote_model(TransactionBehavior::Supported, TransactionPropagation::Identical);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(&simple_call_trace(loc1(), loc1()), &mut []);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidLocationTransition { .. })
        ));
    }

    #[test]
    fn test_local_call_with_location_change_fails() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(&simple_call_trace(loc2(), loc2()), &mut []);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidLocationTransition { .. })
        ));
    }

    #[test]
    fn test_modified_remote_connection_allocates_synthetic_location() {
        // The captured trace was co-located; the derived model extracts
        // the candidate behind a remote connection.
        let base = local_model(TransactionBehavior::Supported);
        let model = base
            .derive()
            .remote_connection(
                "frontend",
                "backend",
                TimeOffset::from_raw(10),
                TransactionPropagation::Identical,
            )
            .build()
            .unwrap();
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        simulator
            .process_trace(&simple_call_trace(loc1(), loc1()), &mut listeners)
            .unwrap();
        assert!(recorder.entry_locations[0].is_synthetic());
        assert_eq!(recorder.end_stack_depth, Some(0));
    }

    #[test]
    fn test_location_mismatch_rule_allocates_synthetic_location() {
        let model = remote_model(TransactionBehavior::Supported, TransactionPropagation::Identical);
        let simulator = TraceSimulator::new(&model).with_config(SimulatorConfig {
            synthetic_location_rule: SyntheticLocationRule::LocationMismatch,
            conflict_tracking: false,
        });
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        // Entry recorded at the caller's location: under this rule the
        // engine invents a location instead of failing.
        simulator
            .process_trace(&simple_call_trace(loc1(), loc1()), &mut listeners)
            .unwrap();
        assert!(recorder.entry_locations[0].is_synthetic());
    }

    #[test]
    fn test_required_opens_and_commits_implicit_transaction() {
        let model = local_model(TransactionBehavior::Required);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        let summary = simulator
            .process_trace(&simple_call_trace(loc1(), loc1()), &mut listeners)
            .unwrap();
        assert_eq!(recorder.started, vec!["sim-1"]);
        assert_eq!(recorder.committed, vec!["sim-1"]);
        assert!(recorder.aborted.is_empty());
        assert_eq!(summary.transactions_opened, 1);
        assert_eq!(summary.transactions_committed, 1);
        assert_eq!(recorder.entry_transactions, vec![Some("sim-1".to_string())]);
    }

    #[test]
    fn test_entry_declared_transaction_id_is_used() {
        let model = local_model(TransactionBehavior::Required);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        let mut events = simple_call_trace(loc1(), loc1()).into_events();
        events[2] = ev(
            210,
            loc1(),
            EventKind::CandidateEntry {
                name: "sc1".to_string(),
                starts_transaction: true,
                transaction_id: Some("tx-entry".to_string()),
            },
        );
        simulator
            .process_trace(&trace(events), &mut listeners)
            .unwrap();
        assert_eq!(recorder.started, vec!["tx-entry"]);
        assert_eq!(recorder.committed, vec!["tx-entry"]);
    }

    #[test]
    fn test_implicit_abort_flips_exit_outcome() {
        let model = local_model(TransactionBehavior::Required);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc1()),
                    tx_abort(300, "sim-1", false),
                    exit(400, "sc1", loc1()),
                    ret(410, "sc1"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert!(recorder.committed.is_empty());
        assert_eq!(recorder.aborted, vec!["sim-1"]);
        assert_eq!(summary.transactions_aborted, 1);
    }

    #[test]
    fn test_explicit_transaction_lifecycle() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "tx1"),
                    tx_commit(190, "tx1"),
                    uc_end(200),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert_eq!(recorder.started, vec!["tx1"]);
        assert_eq!(recorder.committed, vec!["tx1"]);
    }

    #[test]
    fn test_nested_explicit_start_fails() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![
                uc_start(100),
                tx_start(110, "tx1"),
                tx_start(120, "tx2"),
            ]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidTransactionState { .. })
        ));
    }

    #[test]
    fn test_commit_without_transaction_fails() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![uc_start(100), tx_commit(110, "tx1")]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidTransactionState { .. })
        ));
    }

    #[test]
    fn test_explicit_abort_without_transaction_is_no_op() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let summary = simulator
            .process_trace(
                &trace(vec![uc_start(100), tx_abort(110, "tx1", true), uc_end(200)]),
                &mut [],
            )
            .unwrap();
        assert_eq!(summary.transactions_aborted, 0);
    }

    #[test]
    fn test_requires_new_suspends_and_restores_outer_transaction() {
        let model = remote_model(TransactionBehavior::RequiresNew, TransactionPropagation::Identical);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "outer"),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc2()),
                    exit(400, "sc1", loc2()),
                    ret(410, "sc1"),
                    tx_commit(450, "outer"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert_eq!(recorder.started, vec!["outer", "sim-1"]);
        // The inner transaction completes at exit, the outer at commit.
        assert_eq!(recorder.committed, vec!["sim-1", "outer"]);
        assert_eq!(recorder.entry_transactions, vec![Some("sim-1".to_string())]);
    }

    #[test]
    fn test_subordinate_propagation_completes_with_root() {
        let model = remote_model(TransactionBehavior::Supported, TransactionPropagation::Subordinate);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "outer"),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc2()),
                    exit(400, "sc1", loc2()),
                    ret(410, "sc1"),
                    tx_commit(450, "outer"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        // The subordinate is announced as a new transaction object with
        // its parent's id, and completes only when the root commits.
        assert_eq!(recorder.started, vec!["outer", "outer"]);
        assert_eq!(recorder.committed, vec!["outer", "outer"]);
        assert_eq!(summary.transactions_opened, 2);
        assert_eq!(summary.transactions_committed, 2);
    }

    #[test]
    fn test_propagation_none_suspends_transaction() {
        let model = remote_model(TransactionBehavior::Supported, TransactionPropagation::None);
        let simulator = TraceSimulator::new(&model);
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut recorder];

        simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "outer"),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc2()),
                    exit(400, "sc1", loc2()),
                    ret(410, "sc1"),
                    tx_commit(450, "outer"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert_eq!(recorder.entry_transactions, vec![None]);
        assert_eq!(recorder.committed, vec!["outer"]);
    }

    #[test]
    fn test_mandatory_without_usable_transaction_fails() {
        let model = local_model(TransactionBehavior::Mandatory);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(&simple_call_trace(loc1(), loc1()), &mut []);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidTransactionState { .. })
        ));
    }

    #[test]
    fn test_never_with_usable_transaction_fails() {
        let model = local_model(TransactionBehavior::Never);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![
                uc_start(100),
                tx_start(110, "tx1"),
                invocation(200, "sc1"),
                entry(210, "sc1", loc1()),
            ]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidTransactionState { .. })
        ));
    }

    #[test]
    fn test_unmapped_use_case_fails() {
        let model = DeploymentModelBuilder::new().component("c").build().unwrap();
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(&trace(vec![uc_start(100)]), &mut []);
        assert!(matches!(result, Err(SimulationError::UnmappedUseCase { .. })));
    }

    #[test]
    fn test_unmapped_candidate_fails() {
        let model = DeploymentModelBuilder::new()
            .component("frontend")
            .use_case("uc", "frontend")
            .build()
            .unwrap();
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![
                uc_start(100),
                invocation(200, "sc1"),
                entry(210, "sc1", loc1()),
            ]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::UnmappedServiceCandidate { .. })
        ));
    }

    #[test]
    fn test_unmapped_entity_type_fails() {
        let model = DeploymentModelBuilder::new()
            .component("frontend")
            .use_case("uc", "frontend")
            .build()
            .unwrap();
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![
                uc_start(100),
                read(110, loc1(), Entity::new("Order", "1")),
            ]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::UnmappedEntityType { .. })
        ));
    }

    #[test]
    fn test_missing_connection_fails() {
        let model = builder_with_candidate(TransactionBehavior::Supported)
            .build()
            .unwrap();
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(&simple_call_trace(loc1(), loc1()), &mut []);
        assert!(matches!(
            result,
            Err(SimulationError::MissingConnection { .. })
        ));
    }

    #[test]
    fn test_unpaired_invocation_fails() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![uc_start(100), invocation(200, "sc1"), uc_end(300)]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::MalformedEventPairing { .. })
        ));
    }

    #[test]
    fn test_lone_entry_fails() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let result = simulator.process_trace(
            &trace(vec![uc_start(100), entry(210, "sc1", loc1())]),
            &mut [],
        );
        assert!(matches!(
            result,
            Err(SimulationError::MalformedEventPairing { .. })
        ));
    }

    #[test]
    fn test_batch_isolates_failing_trace() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = TraceSimulator::new(&model);
        let bad = trace(vec![uc_start(100), entry(110, "sc1", loc1())]);
        let good = trace(vec![uc_start(100), uc_end(200)]);

        let results = simulator.process_batch(&[bad, good], &mut []);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    fn conflict_simulator(model: &DeploymentModel) -> TraceSimulator<'_> {
        TraceSimulator::new(model).with_conflict_tracking(true)
    }

    fn order() -> Entity {
        Entity::new("Order", "42")
    }

    #[test]
    fn test_read_write_conflict_across_transactions() {
        let model = local_model(TransactionBehavior::RequiresNew);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut collector];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "outer"),
                    write(120, loc1(), order()),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc1()),
                    read(300, loc1(), order()),
                    exit(400, "sc1", loc1()),
                    ret(410, "sc1"),
                    tx_commit(450, "outer"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.findings()[0].kind, ConflictKind::ReadWrite);
        assert_eq!(
            collector.findings()[0].event.timestamp,
            Timestamp::from_raw(300)
        );
        assert_eq!(summary.conflicts, 1);
    }

    #[test]
    fn test_read_in_same_transaction_is_not_a_conflict() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut collector];

        simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "tx1"),
                    write(120, loc1(), order()),
                    read(130, loc1(), order()),
                    tx_commit(190, "tx1"),
                    uc_end(200),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert!(collector.is_empty());
    }

    #[test]
    fn test_read_in_subordinate_of_writer_is_not_a_conflict() {
        let model = remote_model(TransactionBehavior::Supported, TransactionPropagation::Subordinate);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut collector];

        simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "outer"),
                    write(120, loc1(), order()),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc2()),
                    read(300, loc2(), order()),
                    exit(400, "sc1", loc2()),
                    ret(410, "sc1"),
                    tx_commit(450, "outer"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert!(collector.is_empty());
    }

    #[test]
    fn test_write_write_conflict_marks_abort_only() {
        let model = local_model(TransactionBehavior::RequiresNew);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut recorder = Recorder::default();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> =
            vec![&mut collector, &mut recorder];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "outer"),
                    write(120, loc1(), order()),
                    invocation(200, "sc1"),
                    entry(210, "sc1", loc1()),
                    write(300, loc1(), order()),
                    exit(400, "sc1", loc1()),
                    ret(410, "sc1"),
                    tx_commit(450, "outer"),
                    uc_end(500),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.findings()[0].kind, ConflictKind::WriteWrite);
        // The inner transaction became abort-only and aborts at exit.
        assert_eq!(recorder.aborted, vec!["sim-1"]);
        assert_eq!(recorder.committed, vec!["outer"]);
        // The outer pending write survives and commits.
        assert!(summary.committed_writes.contains(&order().key()));
    }

    #[test]
    fn test_write_outside_transaction_auto_commits() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut collector];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    write(110, loc1(), order()),
                    read(120, loc1(), order()),
                    uc_end(200),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert!(collector.is_empty());
        assert!(summary.committed_writes.contains(&order().key()));
    }

    #[test]
    fn test_aborted_writes_are_discarded() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut collector];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "tx1"),
                    write(120, loc1(), order()),
                    tx_abort(130, "tx1", true),
                    read(140, loc1(), order()),
                    uc_end(200),
                ]),
                &mut listeners,
            )
            .unwrap();
        // The aborted write is gone: the later read sees pre-transaction
        // state without conflict.
        assert!(collector.is_empty());
        assert!(summary.committed_writes.is_empty());
        assert_eq!(summary.transactions_aborted, 1);
    }

    #[test]
    fn test_committed_writes_visible_without_conflict() {
        let model = local_model(TransactionBehavior::Supported);
        let simulator = conflict_simulator(&model);
        let mut collector = crate::conflict::ConflictCollector::new();
        let mut listeners: Vec<&mut dyn TraceSimulationListener> = vec![&mut collector];

        let summary = simulator
            .process_trace(
                &trace(vec![
                    uc_start(100),
                    tx_start(110, "tx1"),
                    write(120, loc1(), order()),
                    tx_commit(130, "tx1"),
                    read(140, loc1(), order()),
                    uc_end(200),
                ]),
                &mut listeners,
            )
            .unwrap();
        assert!(collector.is_empty());
        assert!(summary.committed_writes.contains(&order().key()));
    }
}
