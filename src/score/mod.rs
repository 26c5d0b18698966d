use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/score", get(handlers::get_score))
        .route("/api/profile", get(handlers::get_profile))
        .route("/api/profile/about", put(handlers::put_about))
}
