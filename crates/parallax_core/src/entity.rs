//! Persistent entities referenced by read/write events.

use serde::{Deserialize, Serialize};

/// An entity touched by a read or write event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type name
    pub type_name: String,
    /// Entity id within its type
    pub id: String,
    /// Owning root entity, if this entity is a dependent of an aggregate
    pub root: Option<(String, String)>,
}

impl Entity {
    /// Create an entity without a root reference
    #[must_use]
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            root: None,
        }
    }

    /// Attach a root reference
    #[must_use]
    pub fn with_root(mut self, root_type: impl Into<String>, root_id: impl Into<String>) -> Self {
        self.root = Some((root_type.into(), root_id.into()));
        self
    }

    /// The key under which this entity participates in conflict detection.
    ///
    /// Two entities are the same conflict key iff type and id match; the
    /// root reference does not contribute.
    #[must_use]
    pub fn key(&self) -> EntityKey {
        EntityKey {
            type_name: self.type_name.clone(),
            id: self.id.clone(),
        }
    }
}

/// Conflict key of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    /// Entity type name
    pub type_name: String,
    /// Entity id within its type
    pub id: String,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.type_name, self.id)
    }
}
