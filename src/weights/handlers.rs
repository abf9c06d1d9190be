use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::state::AppState;

use super::repo::{self, WeightEntry};

#[derive(Debug, Serialize)]
pub struct WeightItem {
    pub id: Uuid,
    pub weight_kg: f64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct AddWeightRequest {
    pub weight_kg: f64,
}

#[derive(Debug, Serialize)]
pub struct WeightCreatedResponse {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user/weights", get(list_weights))
        .route("/users/:user/weights", post(add_weight))
}

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<WeightItem>>, (StatusCode, String)> {
    let weights = repo::list_by_user(&state.db, &user)
        .await
        .map_err(internal)?;
    let items = weights
        .into_iter()
        .map(|w| WeightItem {
            id: w.id,
            weight_kg: w.weight_kg,
            created_at: w.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn add_weight(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(body): Json<AddWeightRequest>,
) -> Result<(StatusCode, Json<WeightCreatedResponse>), (StatusCode, String)> {
    if !body.weight_kg.is_finite() || body.weight_kg <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "weight_kg must be a positive number".into(),
        ));
    }

    let entry = WeightEntry {
        id: Uuid::new_v4(),
        user_key: user,
        weight_kg: body.weight_kg,
        created_at: OffsetDateTime::now_utc(),
    };
    repo::insert(&state.db, &entry).await.map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(WeightCreatedResponse {
            id: entry.id,
            created_at: entry.created_at,
        }),
    ))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
