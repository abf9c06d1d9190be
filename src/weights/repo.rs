use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightEntry {
    pub id: Uuid,
    pub user_key: String,
    pub weight_kg: f64,
    pub created_at: OffsetDateTime,
}

/// Full weight history for one user, oldest first (chart order).
pub async fn list_by_user(db: &PgPool, user_key: &str) -> anyhow::Result<Vec<WeightEntry>> {
    let rows = sqlx::query_as::<_, WeightEntry>(
        r#"
        SELECT id, user_key, weight_kg, created_at
        FROM weight_entries
        WHERE user_key = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_key)
    .fetch_all(db)
    .await
    .context("list weights by user")?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, entry: &WeightEntry) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO weight_entries (id, user_key, weight_kg, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(entry.id)
    .bind(&entry.user_key)
    .bind(entry.weight_kg)
    .bind(entry.created_at)
    .execute(db)
    .await
    .context("insert weight entry")?;
    Ok(())
}
