use anyhow::Context;
use sqlx::PgPool;

/// Consumed freeze tokens for one user. A user with no row has consumed none.
pub async fn freeze_tokens_used(db: &PgPool, user_key: &str) -> anyhow::Result<u32> {
    let used = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT freeze_tokens_used
        FROM profile_stats
        WHERE user_key = $1
        "#,
    )
    .bind(user_key)
    .fetch_optional(db)
    .await
    .context("get freeze tokens used")?;
    Ok(used.unwrap_or(0).max(0) as u32)
}

pub async fn set_freeze_tokens_used(db: &PgPool, user_key: &str, count: u32) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profile_stats (user_key, freeze_tokens_used)
        VALUES ($1, $2)
        ON CONFLICT (user_key) DO UPDATE SET freeze_tokens_used = EXCLUDED.freeze_tokens_used
        "#,
    )
    .bind(user_key)
    .bind(count as i32)
    .execute(db)
    .await
    .context("set freeze tokens used")?;
    Ok(())
}
