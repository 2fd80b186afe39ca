//! PARALLAX Deployment Model
//!
//! Assignment of use cases, service candidates and entity types to
//! components and data stores, plus the inter-component connection table.
//! Models are immutable after `build()` and safely shared across parallel
//! trace replays.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod candidate;
pub mod component;
pub mod connection;
pub mod error;
pub mod model;

// Re-exports
pub use builder::{DeltaBuilder, DeploymentModelBuilder};
pub use candidate::{ServiceCandidate, TransactionBehavior};
pub use component::{Component, DataStore};
pub use connection::{Connection, ConnectionKind, TransactionPropagation};
pub use error::{ModelError, ModelResult};
pub use model::DeploymentModel;
