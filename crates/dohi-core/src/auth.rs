//! Authentication models

use serde::{Deserialize, Serialize};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Body for `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body for `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,

    #[serde(rename = "password_confirmation")]
    pub password_confirmation: String,
}

/// Body for `POST /auth/change-password`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Successful login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub token: String,

    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// The caller's profile (`GET /me`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}
