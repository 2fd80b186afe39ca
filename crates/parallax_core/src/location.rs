//! Execution locations.
//!
//! A location identifies where code ran. Observed locations come from the
//! monitoring data as captured; synthetic locations are invented by the
//! simulation engine when a modified connection requires a location split
//! that the original trace did not contain.

use serde::{Deserialize, Serialize};

/// Where an event was (or would have been) executed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// A location captured by the monitoring infrastructure
    Observed {
        /// Host name
        host: String,
        /// Process id on the host
        process_id: u64,
        /// Thread id within the process
        thread_id: u64,
    },
    /// A location allocated by the simulation engine
    Synthetic(u64),
}

impl Location {
    /// Create an observed location
    #[must_use]
    pub fn observed(host: impl Into<String>, process_id: u64, thread_id: u64) -> Self {
        Self::Observed {
            host: host.into(),
            process_id,
            thread_id,
        }
    }

    /// Create a synthetic location
    #[must_use]
    pub const fn synthetic(id: u64) -> Self {
        Self::Synthetic(id)
    }

    /// Whether this location was invented by the engine
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Observed {
                host,
                process_id,
                thread_id,
            } => write!(f, "{host}:{process_id}:{thread_id}"),
            Self::Synthetic(id) => write!(f, "synthetic:{id}"),
        }
    }
}
