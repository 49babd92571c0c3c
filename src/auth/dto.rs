use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo::User;

/// Request body for login. Fields are optional so that a missing field is a
/// 400 from our validation rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Response returned after login or signup.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

/// Plain confirmation body (logout, delete).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
