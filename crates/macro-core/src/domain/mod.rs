//! Domain Layer
//!
//! Entities of the macro tree, their wire records, and input rules.

mod button;
mod content;
mod entity;
mod group;
mod input;
mod user;

pub use button::{Button, ButtonRecord};
pub use content::{Content, ContentRecord};
pub use entity::{DomainError, DomainResult, Entity, EntityKind};
pub use group::{Group, GroupRecord};
pub use input::{cap_text, sanitize_name, SanitizedName, MAX_NAME_CHARS, MAX_TEXT_CHARS};
pub use user::{CurrentUser, UserRole};
