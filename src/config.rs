use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Missing key disables the oracle; meal logging then always takes the
    /// fallback assessment path.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub storage: StorageConfig,
    pub oracle: OracleConfig,
    /// Fixed offset used to turn entry timestamps into local calendar days.
    pub utc_offset_hours: i8,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "corpus-sanum".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".into()),
            secret_key: std::env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".into()),
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        let oracle = OracleConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".into()),
            endpoint: std::env::var("GEMINI_ENDPOINT")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            timeout_seconds: std::env::var("GEMINI_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        let utc_offset_hours = std::env::var("APP_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .unwrap_or(0);
        Ok(Self {
            database_url,
            storage,
            oracle,
            utc_offset_hours,
        })
    }
}
