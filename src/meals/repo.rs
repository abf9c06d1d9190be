use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, sqlx::Type)]
#[sqlx(type_name = "portion_size", rename_all = "lowercase")]
pub enum PortionSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// One immutable journal entry. The assessment is written once at creation
/// and never touched again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_key: String,
    pub description: String,
    pub portion: PortionSize,
    /// Storage keys of the attached images, in upload order.
    pub image_keys: Vec<String>,
    pub assessment: String,
    pub created_at: OffsetDateTime,
}

/// Full history for one user, newest first. The streak engine needs the
/// unfiltered log, so there is no pagination here.
pub async fn list_by_user(db: &PgPool, user_key: &str) -> anyhow::Result<Vec<MealEntry>> {
    let rows = sqlx::query_as::<_, MealEntry>(
        r#"
        SELECT id, user_key, description, portion, image_keys, assessment, created_at
        FROM meal_entries
        WHERE user_key = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_key)
    .fetch_all(db)
    .await
    .context("list meals by user")?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, entry: &MealEntry) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO meal_entries (id, user_key, description, portion, image_keys, assessment, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id)
    .bind(&entry.user_key)
    .bind(&entry.description)
    .bind(entry.portion)
    .bind(&entry.image_keys)
    .bind(&entry.assessment)
    .bind(entry.created_at)
    .execute(db)
    .await
    .context("insert meal entry")?;
    Ok(())
}
