use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// One running score record per user, created lazily on first access.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreRecord {
    pub user_id: Uuid,
    pub total_points: i32,
    pub streak: i32,
    pub level: i32,
    pub tasks_completed: i32,
    pub about: String,
}

pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ScoreRecord>> {
    let rec = sqlx::query_as::<_, ScoreRecord>(
        r#"
        SELECT user_id, total_points, streak, level, tasks_completed, about
        FROM scores
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(rec)
}

/// Return the record, creating a zero-valued one if absent. The insert is
/// an atomic upsert, so concurrent first accesses cannot create
/// duplicates.
pub async fn ensure(db: &PgPool, user_id: Uuid) -> anyhow::Result<ScoreRecord> {
    sqlx::query(
        r#"
        INSERT INTO scores (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    let rec = sqlx::query_as::<_, ScoreRecord>(
        r#"
        SELECT user_id, total_points, streak, level, tasks_completed, about
        FROM scores
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(rec)
}

/// Atomic upsert-increment of `total_points`. Creates the record with
/// `total_points = delta` when absent.
pub async fn add_points(db: &PgPool, user_id: Uuid, delta: i32) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO scores (user_id, total_points)
        VALUES ($1, $2)
        ON CONFLICT (user_id)
        DO UPDATE SET total_points = scores.total_points + EXCLUDED.total_points
        "#,
    )
    .bind(user_id)
    .bind(delta)
    .execute(db)
    .await?;
    Ok(())
}

/// Atomic upsert touching only the `about` field.
pub async fn set_about(db: &PgPool, user_id: Uuid, about: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO scores (user_id, about)
        VALUES ($1, $2)
        ON CONFLICT (user_id)
        DO UPDATE SET about = EXCLUDED.about
        "#,
    )
    .bind(user_id)
    .bind(about)
    .execute(db)
    .await?;
    Ok(())
}

/// Best-effort counter sync; not required to be atomic with the reads
/// that triggered it.
pub async fn set_counters(
    db: &PgPool,
    user_id: Uuid,
    tasks_completed: i32,
    streak: i32,
    level: i32,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE scores
        SET tasks_completed = $2, streak = $3, level = $4
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(tasks_completed)
    .bind(streak)
    .bind(level)
    .execute(db)
    .await?;
    Ok(())
}
