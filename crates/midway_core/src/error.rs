//! # Entity Error Types
//!
//! All errors that can occur while managing entity slots.

use thiserror::Error;

use crate::entity::{EntityId, EntityKind};

/// Errors that can occur in the entity core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// No slot could be handed out. Either the table is full, or the request
    /// was for a misc entity and the remaining slots are held back for
    /// gameplay entities.
    #[error("no free entity slot: {free} free, {misc_in_use} misc entities alive")]
    Exhausted {
        /// Free slots at the time of the request.
        free: usize,
        /// Misc entities alive at the time of the request.
        misc_in_use: usize,
    },

    /// A specific slot was requested but something already lives there.
    #[error("entity slot {0} is already in use")]
    Conflict(EntityId),

    /// The id does not name a slot in this world.
    #[error("entity id {id} out of range for capacity {capacity}")]
    OutOfRange {
        /// The offending id.
        id: EntityId,
        /// Number of slots in the world.
        capacity: usize,
    },

    /// The slot exists but holds no entity.
    #[error("entity {0} is not alive")]
    NotAlive(EntityId),

    /// The slot was released twice.
    #[error("entity slot {0} is already free")]
    AlreadyFree(EntityId),

    /// An entity cannot be created with this kind.
    #[error("cannot create an entity of kind {0:?}")]
    InvalidKind(EntityKind),
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors raised while loading an [`EntityConfig`](crate::EntityConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
