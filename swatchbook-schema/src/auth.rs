//! Sign-up / sign-in payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/auth/signin`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
