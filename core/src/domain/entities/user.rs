//! User entity representing a registered farm owner or worker.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role carried in the user record and in session claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Self-registered farm owner
    #[default]
    Farmer,
    /// Farm hand added by an owner
    Worker,
    /// Operator account
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Farmer => "farmer",
            UserRole::Worker => "worker",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "farmer" => Ok(UserRole::Farmer),
            "worker" => Ok(UserRole::Worker),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User entity
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    pub name: String,

    pub email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub avatar: Option<String>,

    pub role: UserRole,

    pub farm_name: Option<String>,

    pub location: Option<String>,

    pub is_verified: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified farmer account
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            avatar: None,
            role: UserRole::Farmer,
            farm_name: None,
            location: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_farm(mut self, farm_name: Option<String>, location: Option<String>) -> Self {
        self.farm_name = farm_name;
        self.location = location;
        self
    }

    /// Applies a profile update; absent fields are left untouched
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        if let Some(farm_name) = update.farm_name {
            self.farm_name = Some(farm_name);
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        self.updated_at = Utc::now();
    }

    /// Replaces the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}
