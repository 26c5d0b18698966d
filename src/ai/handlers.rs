use axum::{extract::State, Json};
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::{CompletionResponse, PromptRequest};

#[instrument(skip(state, body))]
pub async fn test_ai(
    State(state): State<AppState>,
    Json(body): Json<PromptRequest>,
) -> Result<Json<CompletionResponse>, ApiError> {
    if body.prompt.trim().is_empty() {
        return Err(ApiError::Validation("Prompt must not be empty".into()));
    }

    let response = state.ai.complete(&body.prompt).await.map_err(|e| {
        warn!(error = %e, "text completion failed");
        ApiError::Upstream(e.to_string())
    })?;

    Ok(Json(CompletionResponse { response }))
}
