use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::wire::nullable_default;
use crate::pii::Masked;

/// Session role as stored on the user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    User,
    Operator,
    Admin,
    Unknown(String),
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Role::User,
            "operator" => Role::Operator,
            "admin" => Role::Admin,
            _ => Role::Unknown(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Operator => "operator",
            Role::Admin => "admin",
            Role::Unknown(raw) => raw,
        }
    }

    /// Operators and admins may edit bookings and answer guests.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Operator | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|r| Role::parse(&r)).unwrap_or_default())
    }
}

/// User record, as returned by login, profile and user-info endpoints and
/// as kept in durable session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable_default")]
    pub firstname: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub lastname: String,
    #[serde(default, deserialize_with = "nullable_default")]
    pub username: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default, deserialize_with = "nullable_default")]
    pub email: String,
    #[serde(default)]
    pub avatarurl: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.firstname, self.lastname);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub token: Masked<String>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    pub email: String,
    pub password: Masked<String>,
}

/// Self-service profile changes. Unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatarurl: Option<String>,
    #[serde(rename = "oldPassword", skip_serializing_if = "Option::is_none")]
    pub old_password: Option<Masked<String>>,
    #[serde(rename = "newPassword", skip_serializing_if = "Option::is_none")]
    pub new_password: Option<Masked<String>>,
}

/// Admin edit of another user's record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatarurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "newPassword", skip_serializing_if = "Option::is_none")]
    pub new_password: Option<Masked<String>>,
}
