//! Model construction errors.

use thiserror::Error;

/// Result type for model building
pub type ModelResult<T> = Result<T, ModelError>;

/// Error raised while building a deployment model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An assignment or connection references an undeclared component
    #[error("unknown component '{name}' referenced by {referrer}")]
    UnknownComponent {
        /// Missing component name
        name: String,
        /// What referenced it
        referrer: String,
    },

    /// An entity-type assignment references an undeclared data store
    #[error("unknown data store '{name}' referenced by entity type '{entity_type}'")]
    UnknownDataStore {
        /// Missing data store name
        name: String,
        /// Referencing entity type
        entity_type: String,
    },

    /// A delta override names a service candidate the base model lacks
    #[error("cannot override unknown service candidate '{name}'")]
    UnknownServiceCandidate {
        /// Missing candidate name
        name: String,
    },

    /// Two connections were declared for the same ordered component pair
    #[error("duplicate connection from '{from}' to '{to}'")]
    DuplicateConnection {
        /// Source component name
        from: String,
        /// Target component name
        to: String,
    },

    /// A connection was declared from a component to itself
    #[error("self-connection declared for component '{name}'; self-connections are implicitly local")]
    SelfConnection {
        /// Component name
        name: String,
    },
}
