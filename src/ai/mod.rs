use crate::state::AppState;
use axum::{routing::post, Router};

pub mod client;
mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/testai", post(handlers::test_ai))
}
