use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;

use crate::meals::repo as meals_repo;
use crate::profiles::repo as profiles_repo;
use crate::state::AppState;
use crate::weights::repo as weights_repo;

use super::habits::{dominant_habit, HabitLabel};
use super::streak::{freeze_tokens_available, summarize, StreakSummary};
use super::timeframe::{filter_by_timeframe, Timeframe};
use super::trend::{interpolate, TrendPoint};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default = "default_timeframe")]
    pub timeframe: Timeframe,
}

fn default_timeframe() -> Timeframe {
    Timeframe::Day
}

/// Entry count and habit label are scoped to the requested window; the
/// streak block and freeze balance always cover the full history.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub timeframe: Timeframe,
    pub entries: usize,
    pub dominant_habit: HabitLabel,
    pub streak: StreakSummary,
    pub freeze_tokens_available: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user/dashboard", get(dashboard))
        .route("/users/:user/weights/trend", get(weight_trend))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let meals = meals_repo::list_by_user(&state.db, &user)
        .await
        .map_err(internal)?;
    let used_tokens = profiles_repo::freeze_tokens_used(&state.db, &user)
        .await
        .map_err(internal)?;

    let now = OffsetDateTime::now_utc();
    let offset = state.local_offset();
    let today = now.to_offset(offset).date();

    let filtered = filter_by_timeframe(&meals, q.timeframe, now);
    let habit = dominant_habit(filtered.iter().map(|m| m.assessment.as_str()));
    let streak = summarize(&meals, today, offset);
    let available = freeze_tokens_available(streak.total_logged_days, used_tokens);

    Ok(Json(DashboardResponse {
        timeframe: q.timeframe,
        entries: filtered.len(),
        dominant_habit: habit,
        streak,
        freeze_tokens_available: available,
    }))
}

#[instrument(skip(state))]
pub async fn weight_trend(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<TrendPoint>>, (StatusCode, String)> {
    let weights = weights_repo::list_by_user(&state.db, &user)
        .await
        .map_err(internal)?;
    Ok(Json(interpolate(&weights)))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
