use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::jwt::CurrentUser, error::ApiError, score, state::AppState};

use super::dto::{CompleteResponse, CreateResolutionRequest, ResolutionView};
use super::{engine, repo};

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_resolutions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ResolutionView>>, ApiError> {
    let rows = repo::list_active(&state.db, user.id).await?;
    let now = OffsetDateTime::now_utc();
    let views = rows
        .into_iter()
        .map(|r| ResolutionView::project(r, now))
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_resolution(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateResolutionRequest>,
) -> Result<(StatusCode, Json<ResolutionView>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title must not be empty".into()));
    }

    // Owner comes from the authenticated caller, never the body.
    let resolution = repo::create(
        &state.db,
        user.id,
        &payload.title,
        payload.description.as_deref(),
        payload.points,
        payload.kind,
        payload.target_date,
    )
    .await?;

    info!(resolution_id = %resolution.id, kind = ?resolution.kind, "resolution created");
    let view = ResolutionView::project(resolution, OffsetDateTime::now_utc());
    Ok((StatusCode::CREATED, Json(view)))
}

/// Existence then ownership: a missing id is 404, someone else's
/// resolution is 403. Neither failure mutates anything.
fn authorize_owner(
    resolution: Option<repo::Resolution>,
    caller_id: Uuid,
) -> Result<repo::Resolution, ApiError> {
    let resolution =
        resolution.ok_or_else(|| ApiError::NotFound("Resolution not found".into()))?;
    if resolution.owner_id != caller_id {
        warn!(resolution_id = %resolution.id, owner_id = %resolution.owner_id, "completion by non-owner");
        return Err(ApiError::Forbidden("Not your resolution".into()));
    }
    Ok(resolution)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn complete_resolution(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CompleteResponse>, ApiError> {
    let resolution = authorize_owner(repo::find_by_id(&state.db, id).await?, user.id)?;

    let now = OffsetDateTime::now_utc();
    let (update, points_awarded) = engine::complete(&resolution, now);

    // Two-step write: mark the resolution, then award points. Not one
    // transaction; a crash in between leaves the resolution marked
    // complete without the award. Accepted gap.
    repo::update_completion(&state.db, resolution.id, update.last_completed_at, update.status)
        .await?;
    score::repo::add_points(&state.db, user.id, points_awarded).await?;

    info!(resolution_id = %id, points_awarded, "resolution completed");
    Ok(Json(CompleteResponse {
        message: format!("'{}' completed", resolution.title),
        points_awarded,
    }))
}


// Needs DATABASE_URL pointing at a disposable, migrated Postgres; run
// with `cargo test -- --ignored`.
#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::auth::repo::User;
    use crate::resolutions::repo::{ResolutionKind, ResolutionStatus};
    use crate::state::AppState;

    async fn migrated_state() -> Option<AppState> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .ok()?;
        sqlx::migrate!("./migrations").run(&db).await.ok()?;
        let mut state = AppState::fake();
        state.db = db;
        Some(state)
    }

    #[tokio::test]
    #[ignore]
    async fn foreign_completion_fails_without_mutation() {
        let Some(state) = migrated_state().await else {
            return;
        };

        let tag = Uuid::new_v4().simple().to_string();
        let owner = User::create(
            &state.db,
            &format!("owner_{tag}"),
            &format!("owner-{tag}@example.com"),
            "unused-hash",
        )
        .await
        .unwrap();
        let intruder = User::create(
            &state.db,
            &format!("intruder_{tag}"),
            &format!("intruder-{tag}@example.com"),
            "unused-hash",
        )
        .await
        .unwrap();
        let resolution = repo::create(
            &state.db,
            owner.id,
            "Run 5k",
            None,
            10,
            ResolutionKind::Daily,
            None,
        )
        .await
        .unwrap();

        let result = complete_resolution(
            State(state.clone()),
            CurrentUser(intruder.clone()),
            Path(resolution.id),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let after = repo::find_by_id(&state.db, resolution.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.status, ResolutionStatus::Active);
        assert!(after.last_completed_at.is_none());
        let intruder_score = score::repo::get(&state.db, intruder.id).await.unwrap();
        assert!(intruder_score.is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn completing_a_nonexistent_id_is_not_found() {
        let Some(state) = migrated_state().await else {
            return;
        };

        let tag = Uuid::new_v4().simple().to_string();
        let caller = User::create(
            &state.db,
            &format!("caller_{tag}"),
            &format!("caller-{tag}@example.com"),
            "unused-hash",
        )
        .await
        .unwrap();

        let result = complete_resolution(
            State(state.clone()),
            CurrentUser(caller.clone()),
            Path(Uuid::new_v4()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(score::repo::get(&state.db, caller.id).await.unwrap().is_none());
    }
}
