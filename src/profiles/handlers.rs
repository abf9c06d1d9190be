use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::analytics::streak::{classify_days, freeze_tokens_available, DAYS_PER_FREEZE_TOKEN};
use crate::meals::repo as meals_repo;
use crate::state::AppState;

use super::repo;

#[derive(Debug, Serialize)]
pub struct FreezeTokenBalance {
    pub earned: u32,
    pub used: u32,
    pub available: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user/freeze-tokens", get(get_balance))
        .route("/users/:user/freeze-tokens/consume", post(consume_token))
}

async fn balance(state: &AppState, user: &str) -> anyhow::Result<FreezeTokenBalance> {
    let meals = meals_repo::list_by_user(&state.db, user).await?;
    let offset = state.local_offset();
    let total_logged_days = classify_days(&meals, offset).len() as u32;
    let used = repo::freeze_tokens_used(&state.db, user).await?;
    Ok(FreezeTokenBalance {
        earned: total_logged_days / DAYS_PER_FREEZE_TOKEN,
        used,
        available: freeze_tokens_available(total_logged_days, used),
    })
}

#[instrument(skip(state))]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<FreezeTokenBalance>, (StatusCode, String)> {
    let b = balance(&state, &user).await.map_err(internal)?;
    Ok(Json(b))
}

/// The explicit consumption action against the counter. The derivation layer
/// never mutates it on its own.
#[instrument(skip(state))]
pub async fn consume_token(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<FreezeTokenBalance>, (StatusCode, String)> {
    let b = balance(&state, &user).await.map_err(internal)?;
    if b.available == 0 {
        return Err((StatusCode::CONFLICT, "no freeze tokens available".into()));
    }

    let used = b.used + 1;
    repo::set_freeze_tokens_used(&state.db, &user, used)
        .await
        .map_err(internal)?;
    info!(%user, used, "freeze token consumed");

    Ok(Json(FreezeTokenBalance {
        earned: b.earned,
        used,
        available: b.available - 1,
    }))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
