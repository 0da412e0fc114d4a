//! Current user, as reported by the session provider.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Super,
    Regular,
    #[default]
    Visitor,
}

/// Unknown roles fall back to `Visitor`
impl FromStr for UserRole {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "admin" => UserRole::Admin,
            "super" => UserRole::Super,
            "regular" => UserRole::Regular,
            _ => UserRole::Visitor,
        })
    }
}

impl UserRole {
    /// Whether the macro editor should offer edit affordances
    pub fn can_edit(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Super)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: UserRole,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<UserRole, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.parse().ok()).unwrap_or_default())
}
