use axum::{extract::State, Json};
use tracing::{instrument, warn};

use crate::{auth::jwt::CurrentUser, error::ApiError, resolutions, state::AppState};

use super::dto::{AboutRequest, AboutResponse, ProfileResponse, ScoreResponse};
use super::repo;

// Streak and level have no algorithm yet; the stored values are synced to
// these constants until one exists.
const STREAK_PLACEHOLDER: i32 = 0;
const LEVEL_PLACEHOLDER: i32 = 1;

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_score(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ScoreResponse>, ApiError> {
    let rec = repo::ensure(&state.db, user.id).await?;
    Ok(Json(ScoreResponse {
        total_points: rec.total_points,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let rec = repo::ensure(&state.db, user.id).await?;

    let tasks_completed = resolutions::repo::count_completed(&state.db, user.id).await? as i32;

    // Read-then-maybe-write; staleness under concurrent completions is
    // acceptable, and a failed sync only delays the next one.
    if tasks_completed != rec.tasks_completed {
        if let Err(e) = repo::set_counters(
            &state.db,
            user.id,
            tasks_completed,
            STREAK_PLACEHOLDER,
            LEVEL_PLACEHOLDER,
        )
        .await
        {
            warn!(error = %e, "counter sync failed");
        }
    }

    Ok(Json(ProfileResponse {
        username: user.username,
        email: user.email,
        total_points: rec.total_points,
        streak: rec.streak,
        level: rec.level,
        tasks_completed,
        about: rec.about,
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn put_about(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AboutRequest>,
) -> Result<Json<AboutResponse>, ApiError> {
    repo::set_about(&state.db, user.id, &payload.about).await?;
    Ok(Json(AboutResponse {
        success: true,
        about: payload.about,
    }))
}
