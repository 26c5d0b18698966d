use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// How a resolution recurs. Fixed at creation; there is no conversion
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resolution_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    Daily,
    Onetime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resolution_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Active,
    Completed,
    Archived,
}

/// Resolution record in the database. Ownership checks are the caller's
/// job; the store itself never filters by anything but what it is asked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resolution {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub points: i32,
    pub kind: ResolutionKind,
    pub target_date: Option<Date>,
    pub status: ResolutionStatus,
    pub last_completed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// All of an owner's resolutions except archived ones. Iteration order is
/// whatever the store returns.
pub async fn list_active(db: &PgPool, owner_id: Uuid) -> anyhow::Result<Vec<Resolution>> {
    let rows = sqlx::query_as::<_, Resolution>(
        r#"
        SELECT id, owner_id, title, description, points, kind, target_date,
               status, last_completed_at, created_at
        FROM resolutions
        WHERE owner_id = $1 AND status <> $2
        "#,
    )
    .bind(owner_id)
    .bind(ResolutionStatus::Archived)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: Option<&str>,
    points: i32,
    kind: ResolutionKind,
    target_date: Option<Date>,
) -> anyhow::Result<Resolution> {
    let row = sqlx::query_as::<_, Resolution>(
        r#"
        INSERT INTO resolutions (owner_id, title, description, points, kind, target_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, owner_id, title, description, points, kind, target_date,
                  status, last_completed_at, created_at
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(points)
    .bind(kind)
    .bind(target_date)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Resolution>> {
    let row = sqlx::query_as::<_, Resolution>(
        r#"
        SELECT id, owner_id, title, description, points, kind, target_date,
               status, last_completed_at, created_at
        FROM resolutions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Partial update restricted to the completion fields. A `None` status
/// leaves the stored status untouched.
pub async fn update_completion(
    db: &PgPool,
    id: Uuid,
    last_completed_at: OffsetDateTime,
    status: Option<ResolutionStatus>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE resolutions
        SET last_completed_at = $2, status = COALESCE($3, status)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(last_completed_at)
    .bind(status)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn count_completed(db: &PgPool, owner_id: Uuid) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM resolutions
        WHERE owner_id = $1 AND status = $2
        "#,
    )
    .bind(owner_id)
    .bind(ResolutionStatus::Completed)
    .fetch_one(db)
    .await?;
    Ok(count)
}
