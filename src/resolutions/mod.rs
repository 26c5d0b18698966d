use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

mod dto;
pub mod engine;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/resolutions",
            get(handlers::list_resolutions).post(handlers::create_resolution),
        )
        .route(
            "/api/resolutions/:id/complete",
            put(handlers::complete_resolution),
        )
}
