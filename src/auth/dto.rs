use serde::{Deserialize, Serialize};

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub token_type: &'static str, // always "bearer"
    pub username: String,
    pub email: String,
}

impl TokenBundle {
    pub fn new(access_token: String, username: String, email: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            username,
            email,
        }
    }
}
