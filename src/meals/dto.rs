use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analytics::timeframe::Timeframe;
use crate::meals::repo::PortionSize;
use crate::oracle::Language;

#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub portion: PortionSize,
    /// Base64 payloads, optionally with a data-URL header.
    #[serde(default)]
    pub images_b64: Vec<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct TimeframeQuery {
    #[serde(default)]
    pub timeframe: Timeframe,
}

#[derive(Debug, Serialize)]
pub struct MealListItem {
    pub id: Uuid,
    pub description: String,
    pub portion: PortionSize,
    /// Assessment with the verdict markers stripped.
    pub assessment: String,
    /// Presigned URLs, same order as the stored images.
    pub images: Vec<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MealCreatedResponse {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub assessment: String,
}
