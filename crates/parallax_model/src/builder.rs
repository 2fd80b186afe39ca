//! Builders for deployment models.
//!
//! `DeploymentModelBuilder` assembles a model from scratch;
//! `DeltaBuilder` starts from an existing model and overrides only named
//! elements, marking everything it touches as modified. The modified flags
//! are what the rewriting engine later uses to decide whether timing must
//! be recomputed.

use crate::candidate::{ServiceCandidate, TransactionBehavior};
use crate::component::{Component, DataStore};
use crate::connection::{Connection, TransactionPropagation};
use crate::error::{ModelError, ModelResult};
use crate::model::{CandidateAssignment, DeploymentModel};
use indexmap::IndexMap;
use parallax_core::TimeOffset;

/// Builder assembling a deployment model from scratch
#[derive(Debug, Default)]
pub struct DeploymentModelBuilder {
    components: IndexMap<String, Component>,
    data_stores: IndexMap<String, DataStore>,
    use_cases: IndexMap<String, String>,
    candidates: IndexMap<String, CandidateAssignment>,
    entity_types: IndexMap<String, String>,
    connections: IndexMap<(String, String), Connection>,
    error: Option<ModelError>,
}

impl DeploymentModelBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a component
    #[must_use]
    pub fn component(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.components.insert(name.clone(), Component::new(name));
        self
    }

    /// Declare a data store
    #[must_use]
    pub fn data_store(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.data_stores.insert(name.clone(), DataStore::new(name));
        self
    }

    /// Assign a use case to a component
    #[must_use]
    pub fn use_case(mut self, name: impl Into<String>, component: impl Into<String>) -> Self {
        self.use_cases.insert(name.into(), component.into());
        self
    }

    /// Assign a service candidate to a component with the default
    /// transaction behavior
    #[must_use]
    pub fn service_candidate(
        self,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        self.service_candidate_with_behavior(name, component, TransactionBehavior::default())
    }

    /// Assign a service candidate to a component with an explicit
    /// transaction behavior
    #[must_use]
    pub fn service_candidate_with_behavior(
        mut self,
        name: impl Into<String>,
        component: impl Into<String>,
        behavior: TransactionBehavior,
    ) -> Self {
        let name = name.into();
        self.candidates.insert(
            name.clone(),
            CandidateAssignment {
                candidate: ServiceCandidate::new(name).with_transaction_behavior(behavior),
                component: component.into(),
            },
        );
        self
    }

    /// Assign an entity type to a data store
    #[must_use]
    pub fn entity_type(mut self, name: impl Into<String>, store: impl Into<String>) -> Self {
        self.entity_types.insert(name.into(), store.into());
        self
    }

    /// Declare a local connection between two components (both directions)
    #[must_use]
    pub fn local_connection(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let (source, target) = (source.into(), target.into());
        self.insert_connection(Connection::local(source, target));
        self
    }

    /// Declare a remote connection between two components (both directions)
    #[must_use]
    pub fn remote_connection(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        latency: TimeOffset,
        propagation: TransactionPropagation,
    ) -> Self {
        let (source, target) = (source.into(), target.into());
        self.insert_connection(Connection::remote(source, target, latency, propagation));
        self
    }

    fn insert_connection(&mut self, connection: Connection) {
        if connection.source() == connection.target() {
            self.record_error(ModelError::SelfConnection {
                name: connection.source().to_string(),
            });
            return;
        }
        let forward = (
            connection.source().to_string(),
            connection.target().to_string(),
        );
        if self.connections.contains_key(&forward) {
            self.record_error(ModelError::DuplicateConnection {
                from: forward.0,
                to: forward.1,
            });
            return;
        }
        let backward = (forward.1.clone(), forward.0.clone());
        self.connections.insert(backward, connection.reversed());
        self.connections.insert(forward, connection);
    }

    fn record_error(&mut self, error: ModelError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Build the model, validating that every assignment and connection
    /// references declared components and data stores
    ///
    /// # Errors
    ///
    /// Returns the first declaration or reference error encountered
    pub fn build(self) -> ModelResult<DeploymentModel> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let model = DeploymentModel {
            components: self.components,
            data_stores: self.data_stores,
            use_cases: self.use_cases,
            candidates: self.candidates,
            entity_types: self.entity_types,
            connections: self.connections,
        };
        validate(&model)?;
        Ok(model)
    }
}

fn validate(model: &DeploymentModel) -> ModelResult<()> {
    for (use_case, component) in &model.use_cases {
        if !model.components.contains_key(component) {
            return Err(ModelError::UnknownComponent {
                name: component.clone(),
                referrer: format!("use case '{use_case}'"),
            });
        }
    }
    for (candidate, assignment) in &model.candidates {
        if !model.components.contains_key(&assignment.component) {
            return Err(ModelError::UnknownComponent {
                name: assignment.component.clone(),
                referrer: format!("service candidate '{candidate}'"),
            });
        }
    }
    for (entity_type, store) in &model.entity_types {
        if !model.data_stores.contains_key(store) {
            return Err(ModelError::UnknownDataStore {
                name: store.clone(),
                entity_type: entity_type.clone(),
            });
        }
    }
    for ((source, target), _) in &model.connections {
        for endpoint in [source, target] {
            if !model.components.contains_key(endpoint) {
                return Err(ModelError::UnknownComponent {
                    name: endpoint.clone(),
                    referrer: format!("connection '{source}' -> '{target}'"),
                });
            }
        }
    }
    Ok(())
}

/// Builder overriding named elements of an existing model.
///
/// Unmentioned elements are carried over unchanged; every candidate or
/// connection touched here comes out with `modified = true`.
#[derive(Debug)]
pub struct DeltaBuilder {
    model: DeploymentModel,
    error: Option<ModelError>,
}

impl DeltaBuilder {
    pub(crate) fn new(model: DeploymentModel) -> Self {
        Self { model, error: None }
    }

    /// Declare an additional component
    #[must_use]
    pub fn component(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.model
            .components
            .insert(name.clone(), Component::new(name));
        self
    }

    /// Declare an additional data store
    #[must_use]
    pub fn data_store(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.model
            .data_stores
            .insert(name.clone(), DataStore::new(name));
        self
    }

    /// Reassign a use case to another component
    #[must_use]
    pub fn move_use_case(
        mut self,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        self.model.use_cases.insert(name.into(), component.into());
        self
    }

    /// Reassign a service candidate to another component
    #[must_use]
    pub fn move_service_candidate(
        mut self,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        let name = name.into();
        match self.model.candidates.get_mut(&name) {
            Some(assignment) => {
                assignment.component = component.into();
                assignment.candidate = assignment.candidate.clone().as_modified();
            }
            None => self.record_error(ModelError::UnknownServiceCandidate { name }),
        }
        self
    }

    /// Change a service candidate's transaction behavior
    #[must_use]
    pub fn set_transaction_behavior(
        mut self,
        name: impl Into<String>,
        behavior: TransactionBehavior,
    ) -> Self {
        let name = name.into();
        match self.model.candidates.get_mut(&name) {
            Some(assignment) => {
                assignment.candidate = assignment
                    .candidate
                    .clone()
                    .with_transaction_behavior(behavior)
                    .as_modified();
            }
            None => self.record_error(ModelError::UnknownServiceCandidate { name }),
        }
        self
    }

    /// Reassign an entity type to another data store
    #[must_use]
    pub fn move_entity_type(
        mut self,
        name: impl Into<String>,
        store: impl Into<String>,
    ) -> Self {
        self.model.entity_types.insert(name.into(), store.into());
        self
    }

    /// Replace the connection between two components with a local one
    /// (both directions, marked modified)
    #[must_use]
    pub fn local_connection(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let (source, target) = (source.into(), target.into());
        self.replace_connection(Connection::local(source, target).as_modified());
        self
    }

    /// Replace the connection between two components with a remote one
    /// (both directions, marked modified)
    #[must_use]
    pub fn remote_connection(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        latency: TimeOffset,
        propagation: TransactionPropagation,
    ) -> Self {
        let (source, target) = (source.into(), target.into());
        self.replace_connection(
            Connection::remote(source, target, latency, propagation).as_modified(),
        );
        self
    }

    fn replace_connection(&mut self, connection: Connection) {
        if connection.source() == connection.target() {
            self.record_error(ModelError::SelfConnection {
                name: connection.source().to_string(),
            });
            return;
        }
        let forward = (
            connection.source().to_string(),
            connection.target().to_string(),
        );
        let backward = (forward.1.clone(), forward.0.clone());
        self.model.connections.insert(backward, connection.reversed());
        self.model.connections.insert(forward, connection);
    }

    fn record_error(&mut self, error: ModelError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Build the derived model
    ///
    /// # Errors
    ///
    /// Returns the first override or reference error encountered
    pub fn build(self) -> ModelResult<DeploymentModel> {
        if let Some(error) = self.error {
            return Err(error);
        }
        validate(&self.model)?;
        Ok(self.model)
    }
}
