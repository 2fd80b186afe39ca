//! PARALLAX Trace Rewriting
//!
//! Listeners that reconstruct a trace event-by-event while the simulation
//! engine drives them: the latency rewriter shifts timestamps and locations
//! to match a changed deployment, the transaction context rewriter adjusts
//! transaction markers on candidate entries. Both preserve event order and
//! count exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod latency;
pub mod rewritten;
pub mod transaction;

// Re-exports
pub use latency::{rewrite_latency, LatencyRewriter, RewriteTrigger};
pub use rewritten::RewrittenTrace;
pub use transaction::{rewrite_transaction_context, TransactionContextRewriter};
