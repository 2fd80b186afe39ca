//! Listener callbacks driven by the simulation engine.
//!
//! Every method has an empty default body, so a listener implements only
//! the hooks it cares about. Callbacks run synchronously, in event order.
//! The context reference is only valid for the duration of the callback;
//! it is mutated in place across the whole replay.

use crate::conflict::ConsistencyFinding;
use crate::context::SimulationContext;
use crate::transaction::TxHandle;
use parallax_core::{Entity, MonitoringEvent};
use parallax_model::Connection;

/// Direction of a call-stack transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Invocation/entry pair: caller to callee
    Call,
    /// Exit/return pair: callee back to caller
    Return,
}

/// Callbacks invoked while the engine walks a trace.
///
/// `on_event` fires exactly once per input event, after the engine has
/// applied that event's effect to the context; the per-kind hooks fire in
/// addition and carry the semantic detail.
#[allow(unused_variables)]
pub trait TraceSimulationListener {
    /// A use case began; the context now points at its owning component
    fn on_use_case_start(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}

    /// A use case ended; fired before the context is cleared
    fn on_use_case_end(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}

    /// A candidate was invoked; the context still points at the caller
    fn on_candidate_invocation(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}

    /// A candidate was entered; the context points at the callee
    fn on_candidate_entry(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}

    /// A candidate was exited; the context still points at the callee
    fn on_candidate_exit(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}

    /// Control returned; the context points at the restored caller
    fn on_candidate_return(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}

    /// About to cross a connection; the context still holds the old tuple
    fn before_transition(
        &mut self,
        direction: TransitionDirection,
        start_event: &MonitoringEvent,
        end_event: &MonitoringEvent,
        connection: &Connection,
        context: &SimulationContext,
    ) {
    }

    /// Crossed a connection; location and transaction are updated
    fn after_transition(
        &mut self,
        direction: TransitionDirection,
        start_event: &MonitoringEvent,
        end_event: &MonitoringEvent,
        connection: &Connection,
        context: &SimulationContext,
    ) {
    }

    /// A new transaction object became current.
    ///
    /// Not fired when an existing transaction merely propagates across a
    /// connection; fired for subordinates created by `Subordinate`
    /// propagation.
    fn on_transaction_started(
        &mut self,
        transaction: TxHandle,
        event: &MonitoringEvent,
        context: &SimulationContext,
    ) {
    }

    /// A transaction completed with a commit outcome. Subordinates are
    /// notified individually after their root.
    fn on_transaction_committed(
        &mut self,
        transaction: TxHandle,
        event: &MonitoringEvent,
        context: &SimulationContext,
    ) {
    }

    /// A transaction completed with an abort outcome. Subordinates are
    /// notified individually after their root.
    fn on_transaction_aborted(
        &mut self,
        transaction: TxHandle,
        event: &MonitoringEvent,
        context: &SimulationContext,
    ) {
    }

    /// An entity was read
    fn on_entity_read(
        &mut self,
        event: &MonitoringEvent,
        entity: &Entity,
        context: &SimulationContext,
    ) {
    }

    /// An entity was written
    fn on_entity_write(
        &mut self,
        event: &MonitoringEvent,
        entity: &Entity,
        context: &SimulationContext,
    ) {
    }

    /// A write outside any transaction committed immediately
    fn on_write_auto_committed(
        &mut self,
        event: &MonitoringEvent,
        entity: &Entity,
        context: &SimulationContext,
    ) {
    }

    /// The conflict-tracking variant detected a consistency conflict
    fn on_conflict(&mut self, finding: &ConsistencyFinding, context: &SimulationContext) {}

    /// Fired exactly once per input event, in order, after the engine
    /// applied the event's effect
    fn on_event(&mut self, event: &MonitoringEvent, context: &SimulationContext) {}
}
