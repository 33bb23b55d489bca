use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::dto::request::CreateUserRequest;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum UserRole {
    Admin,
    #[default]
    Player,
}

impl User {
    pub fn new(username: &str, email: &str, role: UserRole) -> Self {
        User {
            username: username.to_string(),
            email: email.to_string(),
            role,
            created_at: Some(Utc::now()),
        }
    }

    pub fn from_request(request: CreateUserRequest) -> Self {
        User {
            username: request.username,
            email: request.email,
            role: request.role.unwrap_or_default(),
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
impl User {
    pub fn test_player(username: &str) -> Self {
        User::new(
            username,
            &format!("{}@example.com", username),
            UserRole::Player,
        )
    }
}
