use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::images::UploadItem;

/// Markers the oracle appends to every assessment. Only literal substring
/// presence is ever checked downstream.
pub const MARKER_HEALTHY: &str = "[H]";
pub const MARKER_UNHEALTHY: &str = "[U]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "RU")]
    Ru,
}

/// Substituted whenever the oracle fails or returns nothing. Ends in [H] so
/// the day classification stays on its healthy default.
pub fn fallback_assessment(lang: Language) -> &'static str {
    match lang {
        Language::En => "Captured without live analysis. [H]",
        Language::Ru => "Записано без живого анализа. [H]",
    }
}

/// Presentation copy of an assessment: the verdict markers are an internal
/// contract and never shown to the user.
pub fn clean_assessment(assessment: &str) -> String {
    assessment
        .replace(MARKER_HEALTHY, "")
        .replace(MARKER_UNHEALTHY, "")
        .trim()
        .to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("oracle returned status {0}")]
    Status(u16),
    #[error("oracle response had no text content")]
    Malformed,
    #[error("oracle is not configured")]
    Disabled,
}

/// The external assessment collaborator. Implementations are best-effort:
/// callers must tolerate any error by substituting [`fallback_assessment`].
#[async_trait]
pub trait AssessmentOracle: Send + Sync {
    async fn assess(
        &self,
        description: &str,
        images: &[UploadItem],
        language: Language,
    ) -> Result<String, OracleError>;
}

/// Stand-in used when no API key is configured.
pub struct DisabledOracle;

#[async_trait]
impl AssessmentOracle for DisabledOracle {
    async fn assess(
        &self,
        _description: &str,
        _images: &[UploadItem],
        _language: Language,
    ) -> Result<String, OracleError> {
        Err(OracleError::Disabled)
    }
}

pub struct GeminiOracle {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiOracle {
    pub fn new(
        api_key: String,
        model: String,
        endpoint: String,
        timeout: std::time::Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model,
            endpoint,
        })
    }

    fn prompt(description: &str, language: Language) -> String {
        let lang_name = match language {
            Language::En => "English",
            Language::Ru => "Russian",
        };
        format!(
            "You are an expert nutritionist for the \"Corpus Sanum\" reflection app.\n\
             Task: Provide a non-judgmental, insightful assessment of this meal.\n\
             Requirements:\n\
             1. Identify if it is dominant in proteins, carbs, or fats.\n\
             2. Mention possible long-term effects of such a dietary pattern.\n\
             3. Occasionally (30% chance) add a \"Did you know?\" fact about a common diet mistake or nutritional myth.\n\
             4. IMPORTANT: At the very end of your response, you MUST include either {MARKER_HEALTHY} if the meal is generally healthy/balanced or {MARKER_UNHEALTHY} if it is unhealthy/imbalanced.\n\
             5. Language: {lang_name}.\n\
             6. Keep the response concise (max 3-4 sentences).\n\
             7. Tone: Observational, helpful, scientific but accessible.\n\
             Description: \"{description}\""
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl AssessmentOracle for GeminiOracle {
    async fn assess(
        &self,
        description: &str,
        images: &[UploadItem],
        language: Language,
    ) -> Result<String, OracleError> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let mut parts = vec![json!({ "text": Self::prompt(description, language) })];
        for img in images {
            parts.push(json!({
                "inline_data": {
                    "mime_type": img.content_type,
                    "data": STANDARD.encode(&img.body),
                }
            }));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "contents": [{ "parts": parts }] }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }

        let body: GenerateContentResponse = resp.json().await?;
        let text = body
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(OracleError::Malformed);
        }
        debug!(model = %self.model, chars = text.len(), "oracle assessment received");
        Ok(text)
    }
}
