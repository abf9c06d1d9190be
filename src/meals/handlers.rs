use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::analytics::timeframe::filter_by_timeframe;
use crate::images::{decode_base64_image, presign_many};
use crate::oracle::clean_assessment;
use crate::state::AppState;

use super::dto::{LogMealRequest, MealCreatedResponse, MealListItem, TimeframeQuery};
use super::repo;
use super::services::{log_meal, MealDraft};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/users/:user/meals", get(list_meals))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user/meals", post(create_meal))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB of base64 images
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(q): Query<TimeframeQuery>,
) -> Result<Json<Vec<MealListItem>>, (StatusCode, String)> {
    let meals = repo::list_by_user(&state.db, &user)
        .await
        .map_err(internal)?;
    let now = OffsetDateTime::now_utc();

    let mut items = Vec::new();
    for m in filter_by_timeframe(&meals, q.timeframe, now) {
        let images = presign_many(&state, &m.image_keys).await.map_err(internal)?;
        items.push(MealListItem {
            id: m.id,
            description: m.description.clone(),
            portion: m.portion,
            assessment: clean_assessment(&m.assessment),
            images,
            created_at: m.created_at,
        });
    }
    Ok(Json(items))
}

#[instrument(skip(state, body), fields(images = body.images_b64.len()))]
pub async fn create_meal(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(body): Json<LogMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<MealCreatedResponse>), (StatusCode, String)> {
    let mut images = Vec::with_capacity(body.images_b64.len());
    for b64 in &body.images_b64 {
        images.push(
            decode_base64_image(b64).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        );
    }

    let draft = MealDraft {
        description: body.description,
        portion: body.portion,
        images,
        language: body.language,
    };
    draft
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let entry = log_meal(&state, &user, draft).await.map_err(internal)?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/users/{}/meals", user).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(MealCreatedResponse {
            id: entry.id,
            created_at: entry.created_at,
            assessment: clean_assessment(&entry.assessment),
        }),
    ))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
