use crate::state::AppState;
use axum::{routing::post, Router};

mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
}
