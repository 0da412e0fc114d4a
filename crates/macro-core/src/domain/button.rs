//! Button Entity
//!
//! A single pressable macro inside a group. Owns one or more contents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::Content;
use super::entity::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: Uuid,
    pub name: String,
    /// Position within the owning group; authoritative only after normalization
    pub index: usize,
    /// Back-reference to the owning group. The group's `buttons` vector is the real edge.
    pub group_id: Uuid,
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub contents: Vec<Content>,
}

impl Button {
    /// New button with one empty content, as created by the "add button" action
    pub fn new(name: impl Into<String>, index: usize, group_id: Uuid, guild_id: &str) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            name: name.into(),
            index,
            group_id,
            guild_id: guild_id.to_string(),
            contents: vec![Content::new(0, id)],
        }
    }

    pub fn from_record(record: ButtonRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            index: record.index,
            group_id: record.group_id,
            guild_id: record.guild_id,
            contents: Vec::new(),
        }
    }

    pub fn to_record(&self, guild_id: &str) -> ButtonRecord {
        ButtonRecord {
            id: self.id,
            name: self.name.clone(),
            index: self.index,
            group_id: self.group_id,
            guild_id: guild_id.to_string(),
        }
    }
}

/// Flat wire representation of a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonRecord {
    pub id: Uuid,
    pub name: String,
    pub index: usize,
    pub group_id: Uuid,
    #[serde(default)]
    pub guild_id: String,
}

impl Entity for ButtonRecord {
    const KIND: EntityKind = EntityKind::Button;

    fn id(&self) -> Uuid {
        self.id
    }

    fn guild_id(&self) -> &str {
        &self.guild_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_button_has_default_content() {
        let group_id = Uuid::new_v4();
        let button = Button::new("b", 2, group_id, "guild");
        assert_eq!(button.group_id, group_id);
        assert_eq!(button.index, 2);
        assert_eq!(button.contents.len(), 1);
        assert_eq!(button.contents[0].index, 0);
        assert_eq!(button.contents[0].button_id, button.id);
        assert!(button.contents[0].channel_id.is_empty());
    }
}
