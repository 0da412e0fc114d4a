//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all persisted records.
//! Every record is identified by a UUID that is unique across all kinds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three persisted entity kinds of the macro tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Group,
    Button,
    Content,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Group => "group",
            EntityKind::Button => "button",
            EntityKind::Content => "content",
        }
    }

    /// REST collection segment (`/groups`, `/buttons`, `/contents`)
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Group => "groups",
            EntityKind::Button => "buttons",
            EntityKind::Content => "contents",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait for all persisted records
pub trait Entity: Sized + Clone {
    /// Which remote collection this record lives in
    const KIND: EntityKind;

    /// Returns the record's unique identifier
    fn id(&self) -> Uuid;

    /// Owning guild of the record
    fn guild_id(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Remote store returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_) | DomainError::Status { code: 404, .. })
    }
}
