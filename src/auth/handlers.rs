use axum::{
    extract::{FromRef, State},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, TokenBundle},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<TokenBundle>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::Validation("Username must not be empty".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    // Duplicate checks are exact-match and ordered: username first, then email.
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("Username already taken".into()));
    }
    if User::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let user = User::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.issue(&user.username)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(TokenBundle::new(
        access_token,
        user.username,
        user.email,
    )))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenBundle>, ApiError> {
    // Unknown user and wrong password produce the same response, so a
    // failed login never reveals whether the username exists.
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::Unauthenticated("Invalid credentials".into()));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Internal(e)
    })?;

    if !ok {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthenticated("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.issue(&user.username)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(TokenBundle::new(
        access_token,
        user.username,
        user.email,
    )))
}


// Needs DATABASE_URL pointing at a disposable, migrated Postgres; run
// with `cargo test -- --ignored`.
#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::state::AppState;
    use uuid::Uuid;

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
    async fn duplicate_username_signup_conflicts_without_second_record() {
        let Some(state) = migrated_state().await else {
            return;
        };

        let tag = Uuid::new_v4().simple().to_string();
        let username = format!("user_{tag}");

        let first = signup(
            State(state.clone()),
            Json(SignupRequest {
                username: username.clone(),
                email: format!("{tag}@example.com"),
                password: "a-long-enough-password".into(),
            }),
        )
        .await;
        assert!(first.is_ok());

        // Same username, fresh email: refused, and no second row or hash
        let second = signup(
            State(state.clone()),
            Json(SignupRequest {
                username: username.clone(),
                email: format!("other-{tag}@example.com"),
                password: "a-different-password".into(),
            }),
        )
        .await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
                .bind(&username)
                .fetch_one(&state.db)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore]
    async fn duplicate_email_signup_conflicts() {
        let Some(state) = migrated_state().await else {
            return;
        };

        let tag = Uuid::new_v4().simple().to_string();
        let email = format!("{tag}@example.com");

        let first = signup(
            State(state.clone()),
            Json(SignupRequest {
                username: format!("first_{tag}"),
                email: email.clone(),
                password: "a-long-enough-password".into(),
            }),
        )
        .await;
        assert!(first.is_ok());

        let second = signup(
            State(state.clone()),
            Json(SignupRequest {
                username: format!("second_{tag}"),
                email,
                password: "a-long-enough-password".into(),
            }),
        )
        .await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));
    }
}
