use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub total_points: i32,
}

/// Profile view: score fields plus the identity they belong to.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub total_points: i32,
    pub streak: i32,
    pub level: i32,
    pub tasks_completed: i32,
    pub about: String,
}

#[derive(Debug, Deserialize)]
pub struct AboutRequest {
    pub about: String,
}

#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub success: bool,
    pub about: String,
}
