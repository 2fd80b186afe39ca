//! Connections between components.

use parallax_core::TimeOffset;
use serde::{Deserialize, Serialize};

/// How a transaction crosses a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionPropagation {
    /// The identical transaction continues on the target side
    Identical,
    /// A new subordinate transaction is created on the target side
    Subordinate,
    /// No transaction reaches the target side
    None,
}

/// Local or remote classification with remote properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Same process: zero latency, identical propagation, no location change
    Local,
    /// Crosses a process boundary
    Remote {
        /// One-way latency added to each call and each return
        latency: TimeOffset,
        /// Transaction propagation across this connection
        propagation: TransactionPropagation,
    },
}

/// A declared relationship between two components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    source: String,
    target: String,
    kind: ConnectionKind,
    modified: bool,
}

impl Connection {
    /// Create a local connection
    #[must_use]
    pub fn local(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: ConnectionKind::Local,
            modified: false,
        }
    }

    /// Create a remote connection
    #[must_use]
    pub fn remote(
        source: impl Into<String>,
        target: impl Into<String>,
        latency: TimeOffset,
        propagation: TransactionPropagation,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: ConnectionKind::Remote {
                latency,
                propagation,
            },
            modified: false,
        }
    }

    /// Mark this connection as changed relative to the captured deployment
    #[must_use]
    pub fn as_modified(mut self) -> Self {
        self.modified = true;
        self
    }

    /// Source component name
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Target component name
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Local/remote classification
    #[must_use]
    pub const fn kind(&self) -> ConnectionKind {
        self.kind
    }

    /// Whether this connection crosses a process boundary
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.kind, ConnectionKind::Remote { .. })
    }

    /// One-way latency; zero for local connections
    #[must_use]
    pub const fn latency(&self) -> TimeOffset {
        match self.kind {
            ConnectionKind::Local => TimeOffset::zero(),
            ConnectionKind::Remote { latency, .. } => latency,
        }
    }

    /// Transaction propagation; identical for local connections
    #[must_use]
    pub const fn propagation(&self) -> TransactionPropagation {
        match self.kind {
            ConnectionKind::Local => TransactionPropagation::Identical,
            ConnectionKind::Remote { propagation, .. } => propagation,
        }
    }

    /// Whether this connection's properties differ from the deployment the
    /// trace was captured under
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// A copy pointing in the opposite direction
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            kind: self.kind,
            modified: self.modified,
        }
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ConnectionKind::Local => write!(f, "{} -> {} (local)", self.source, self.target),
            ConnectionKind::Remote { latency, .. } => {
                write!(f, "{} -> {} (remote, {})", self.source, self.target, latency)
            }
        }
    }
}
