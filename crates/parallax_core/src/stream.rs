//! Event stream cursor for walking a trace.
//!
//! A position-addressable view over a trace's event list. Lookahead and
//! lookback never consume; the engine uses a one-event lookahead to pair
//! invocation/entry and exit/return events.

use crate::event::MonitoringEvent;
use crate::trace::Trace;

/// Cursor over a trace's events
#[derive(Debug)]
pub struct EventStream<'t> {
    events: &'t [MonitoringEvent],
    position: usize,
}

impl<'t> EventStream<'t> {
    /// Create a stream over a trace
    #[must_use]
    pub fn new(trace: &'t Trace) -> Self {
        Self {
            events: trace.events(),
            position: 0,
        }
    }

    /// Create a stream over a raw event slice
    #[must_use]
    pub const fn from_slice(events: &'t [MonitoringEvent]) -> Self {
        Self {
            events,
            position: 0,
        }
    }

    /// Consume and return the next event
    pub fn next(&mut self) -> Option<&'t MonitoringEvent> {
        let event = self.events.get(self.position)?;
        self.position += 1;
        Some(event)
    }

    /// The next event, without consuming it
    #[must_use]
    pub fn peek(&self) -> Option<&'t MonitoringEvent> {
        self.events.get(self.position)
    }

    /// The event `distance` positions ahead of the cursor, without consuming.
    ///
    /// `lookahead(0)` is the same event `peek` returns.
    #[must_use]
    pub fn lookahead(&self, distance: usize) -> Option<&'t MonitoringEvent> {
        self.events.get(self.position.checked_add(distance)?)
    }

    /// The event `distance` positions behind the cursor.
    ///
    /// `lookback(1)` is the most recently consumed event.
    #[must_use]
    pub fn lookback(&self, distance: usize) -> Option<&'t MonitoringEvent> {
        if distance == 0 {
            return None;
        }
        self.events.get(self.position.checked_sub(distance)?)
    }

    /// Current cursor position
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Events not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.position)
    }

    /// Whether the cursor is past the last event
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.position >= self.events.len()
    }

    /// Reset the cursor to the first event
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::location::Location;
    use crate::time::Timestamp;
    use crate::trace::TraceId;

    fn trace_with(n: usize) -> Trace {
        let id = TraceId::from_raw(1);
        let events = (0..n)
            .map(|i| {
                MonitoringEvent::new(
                    id,
                    Timestamp::from_raw(i as i64),
                    Location::observed("host", 1, 1),
                    EventKind::UseCaseStart {
                        name: format!("uc{i}"),
                    },
                )
            })
            .collect();
        Trace::from_events(id, events)
    }

    #[test]
    fn test_next_consumes_in_order() {
        let trace = trace_with(3);
        let mut stream = EventStream::new(&trace);
        assert_eq!(stream.next().unwrap().timestamp, Timestamp::from_raw(0));
        assert_eq!(stream.next().unwrap().timestamp, Timestamp::from_raw(1));
        assert_eq!(stream.next().unwrap().timestamp, Timestamp::from_raw(2));
        assert!(stream.next().is_none());
        assert!(stream.is_end());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let trace = trace_with(2);
        let mut stream = EventStream::new(&trace);
        assert_eq!(stream.peek().unwrap().timestamp, Timestamp::from_raw(0));
        assert_eq!(stream.remaining(), 2);
        stream.next();
        assert_eq!(stream.peek().unwrap().timestamp, Timestamp::from_raw(1));
    }

    #[test]
    fn test_lookahead_bounds() {
        let trace = trace_with(3);
        let mut stream = EventStream::new(&trace);
        stream.next();
        assert_eq!(
            stream.lookahead(0).unwrap().timestamp,
            Timestamp::from_raw(1)
        );
        assert_eq!(
            stream.lookahead(1).unwrap().timestamp,
            Timestamp::from_raw(2)
        );
        assert!(stream.lookahead(2).is_none());
    }

    #[test]
    fn test_lookback_bounds() {
        let trace = trace_with(3);
        let mut stream = EventStream::new(&trace);
        assert!(stream.lookback(1).is_none());
        stream.next();
        stream.next();
        assert_eq!(
            stream.lookback(1).unwrap().timestamp,
            Timestamp::from_raw(1)
        );
        assert_eq!(
            stream.lookback(2).unwrap().timestamp,
            Timestamp::from_raw(0)
        );
        assert!(stream.lookback(3).is_none());
        assert!(stream.lookback(0).is_none());
    }

    #[test]
    fn test_reset() {
        let trace = trace_with(2);
        let mut stream = EventStream::new(&trace);
        stream.next();
        stream.reset();
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.remaining(), 2);
    }

    proptest::proptest! {
        #[test]
        fn prop_consumed_plus_remaining_is_len(len in 0usize..32, steps in 0usize..40) {
            let trace = trace_with(len);
            let mut stream = EventStream::new(&trace);
            for _ in 0..steps {
                stream.next();
            }
            proptest::prop_assert_eq!(stream.position() + stream.remaining(), len);
            proptest::prop_assert_eq!(stream.is_end(), stream.remaining() == 0);
            // Lookback(1) after any consumption is the last consumed event.
            if stream.position() > 0 {
                let last = stream.lookback(1).unwrap();
                proptest::prop_assert_eq!(
                    last.timestamp,
                    Timestamp::from_raw(stream.position() as i64 - 1)
                );
            }
        }
    }
}
