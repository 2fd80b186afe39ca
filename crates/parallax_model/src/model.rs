//! The immutable deployment model.

use crate::builder::DeltaBuilder;
use crate::candidate::ServiceCandidate;
use crate::component::{Component, DataStore};
use crate::connection::Connection;
use indexmap::IndexMap;

/// Assignment of a service candidate to its owning component
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CandidateAssignment {
    pub(crate) candidate: ServiceCandidate,
    pub(crate) component: String,
}

/// Mapping from use cases, service candidates and entity types to owning
/// components and data stores, plus the inter-component connection table.
///
/// Immutable once built; safely shared read-only across parallel replays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentModel {
    pub(crate) components: IndexMap<String, Component>,
    pub(crate) data_stores: IndexMap<String, DataStore>,
    pub(crate) use_cases: IndexMap<String, String>,
    pub(crate) candidates: IndexMap<String, CandidateAssignment>,
    pub(crate) entity_types: IndexMap<String, String>,
    pub(crate) connections: IndexMap<(String, String), Connection>,
}

impl DeploymentModel {
    /// The component owning a use case
    #[must_use]
    pub fn component_for_use_case(&self, name: &str) -> Option<&Component> {
        let component = self.use_cases.get(name)?;
        self.components.get(component)
    }

    /// A service candidate by name
    #[must_use]
    pub fn service_candidate(&self, name: &str) -> Option<&ServiceCandidate> {
        self.candidates.get(name).map(|a| &a.candidate)
    }

    /// The component owning a service candidate
    #[must_use]
    pub fn component_for_service_candidate(&self, name: &str) -> Option<&Component> {
        let assignment = self.candidates.get(name)?;
        self.components.get(&assignment.component)
    }

    /// The data store owning an entity type
    #[must_use]
    pub fn data_store_for_entity_type(&self, name: &str) -> Option<&DataStore> {
        let store = self.entity_types.get(name)?;
        self.data_stores.get(store)
    }

    /// The connection between two components.
    ///
    /// A component is implicitly connected to itself by a local connection;
    /// all other pairs must be declared.
    #[must_use]
    pub fn connection(&self, source: &str, target: &str) -> Option<Connection> {
        if source == target {
            return Some(Connection::local(source, target));
        }
        self.connections
            .get(&(source.to_string(), target.to_string()))
            .cloned()
    }

    /// A component by name
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// All declared connections, in declaration order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Whether any candidate or connection is flagged as modified
    #[must_use]
    pub fn has_modifications(&self) -> bool {
        self.candidates.values().any(|a| a.candidate.is_modified())
            || self.connections.values().any(Connection::is_modified)
    }

    /// Start a delta build that overrides named elements of this model
    #[must_use]
    pub fn derive(&self) -> DeltaBuilder {
        DeltaBuilder::new(self.clone())
    }
}
