//! PARALLAX Core Types
//!
//! Pure value types for recorded traces: timestamps, locations, entities,
//! monitoring events and the event-stream cursor. No I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod event;
pub mod location;
pub mod stream;
pub mod time;
pub mod trace;

// Re-exports
pub use entity::{Entity, EntityKey};
pub use event::{EventKind, MonitoringEvent};
pub use location::Location;
pub use stream::EventStream;
pub use time::{TimeOffset, Timestamp};
pub use trace::{Trace, TraceId};
