//! Group Entity
//!
//! A named, collapsible collection of buttons. Top level of the macro tree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::button::Button;
use super::entity::{Entity, EntityKind};

/// A group of buttons as held by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    /// Position among sibling groups; authoritative only after normalization
    pub index: usize,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl Group {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            index,
            buttons: Vec::new(),
        }
    }

    /// Build a childless group from its stored record
    pub fn from_record(record: GroupRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            index: record.index,
            buttons: Vec::new(),
        }
    }

    /// Scalar fields plus the owning guild, as sent to the remote store
    pub fn to_record(&self, guild_id: &str) -> GroupRecord {
        GroupRecord {
            id: self.id,
            name: self.name.clone(),
            index: self.index,
            guild_id: guild_id.to_string(),
        }
    }
}

/// Flat wire representation of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: Uuid,
    pub name: String,
    pub index: usize,
    #[serde(default)]
    pub guild_id: String,
}

impl Entity for GroupRecord {
    const KIND: EntityKind = EntityKind::Group;

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
    fn test_record_carries_guild() {
        let group = Group::new("alpha", 3);
        let record = group.to_record("guild-1");
        assert_eq!(record.id, group.id);
        assert_eq!(record.index, 3);
        assert_eq!(record.guild_id(), "guild-1");
    }

    #[test]
    fn test_record_wire_format() {
        let group = Group::new("alpha", 0);
        let json = serde_json::to_value(group.to_record("g")).unwrap();
        assert_eq!(json["guildId"], "g");
        assert_eq!(json["name"], "alpha");
        assert!(json.get("buttons").is_none());
    }
}
