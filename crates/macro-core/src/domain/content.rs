//! Content Entity
//!
//! One "send this text to this channel" instruction of a button.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    /// Target channel; empty until the user picks one
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub text: String,
    pub index: usize,
    pub button_id: Uuid,
}

impl Content {
    pub fn new(index: usize, button_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id: String::new(),
            text: String::new(),
            index,
            button_id,
        }
    }

    pub fn from_record(record: ContentRecord) -> Self {
        Self {
            id: record.id,
            channel_id: record.channel_id,
            text: record.text,
            index: record.index,
            button_id: record.button_id,
        }
    }

    pub fn to_record(&self, guild_id: &str) -> ContentRecord {
        ContentRecord {
            id: self.id,
            channel_id: self.channel_id.clone(),
            text: self.text.clone(),
            index: self.index,
            button_id: self.button_id,
            guild_id: guild_id.to_string(),
        }
    }
}

/// Flat wire representation of a content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub text: String,
    pub index: usize,
    pub button_id: Uuid,
    #[serde(default)]
    pub guild_id: String,
}

impl Entity for ContentRecord {
    const KIND: EntityKind = EntityKind::Content;

    fn id(&self) -> Uuid {
        self.id
    }

    fn guild_id(&self) -> &str {
        &self.guild_id
    }
}
