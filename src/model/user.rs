use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Publisher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored account. `password` is always an Argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub password: String,
    /// SHA-256 hex of the outstanding reset token
    #[serde(default)]
    pub reset_password_token: Option<String>,
    #[serde(default)]
    pub reset_password_expire: Option<DateTime>,
    pub created_at: DateTime,
}

impl User {
    pub fn new(name: String, email: String, role: Role, password_hash: String) -> Self {
        User {
            id: None,
            name,
            email: email.to_lowercase(),
            role,
            password: password_hash,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: DateTime::now(),
        }
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }

    /// The identity attached to authenticated requests
    pub fn to_auth_user(&self) -> Option<AuthUser> {
        Some(AuthUser {
            id: self.id?,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        })
    }
}

/// Authenticated caller, reloaded from storage on every request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub role: Role,
}
