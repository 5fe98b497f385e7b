//! # User Model
//!
//! Stored user record and the view returned to clients.
//! Users live in the `users` collection with a unique `email`.

use serde::{Deserialize, Serialize};

/// Collection holding users
pub const USERS: &str = "users";

/// User as persisted in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique e-mail address
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Argon2id hash (never plaintext)
    pub password: String,

    /// Store version counter
    #[serde(rename = "__v", default)]
    pub version: u64,
}

/// Fields written when registering a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Already-hashed password
    pub password: String,
}

/// Client-facing projection of a user: no password, no version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl From<UserRecord> for UserView {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
        }
    }
}
