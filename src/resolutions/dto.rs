use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::engine;
use super::repo::{Resolution, ResolutionKind, ResolutionStatus};

#[derive(Debug, Deserialize)]
pub struct CreateResolutionRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_points")]
    pub points: i32,
    #[serde(rename = "type")]
    pub kind: ResolutionKind,
    pub target_date: Option<Date>,
}

fn default_points() -> i32 {
    10
}

/// Response shape for a resolution. `completed_today` is computed at
/// render time from stored fields and the clock, never persisted.
#[derive(Debug, Serialize)]
pub struct ResolutionView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub points: i32,
    #[serde(rename = "type")]
    pub kind: ResolutionKind,
    pub target_date: Option<Date>,
    pub status: ResolutionStatus,
    pub completed_today: bool,
}

impl ResolutionView {
    pub fn project(resolution: Resolution, now: OffsetDateTime) -> Self {
        let completed_today = engine::is_done_today(&resolution, now);
        Self {
            id: resolution.id,
            title: resolution.title,
            description: resolution.description,
            points: resolution.points,
            kind: resolution.kind,
            target_date: resolution.target_date,
            status: resolution.status,
            completed_today,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub message: String,
    pub points_awarded: i32,
}
