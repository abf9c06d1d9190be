use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::images::{upload_all, UploadItem};
use crate::oracle::{fallback_assessment, Language, OracleError};
use crate::state::AppState;

use super::repo::{self, MealEntry, PortionSize};

/// Everything the user entered in the logging form, validated before the
/// oracle is ever contacted.
pub struct MealDraft {
    pub description: String,
    pub portion: PortionSize,
    pub images: Vec<UploadItem>,
    pub language: Language,
}

impl MealDraft {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.description.trim().is_empty() && self.images.is_empty() {
            return Err("description or at least one image is required");
        }
        Ok(())
    }
}

/// Oracle outcome → stored assessment. Any failure or empty response becomes
/// the localized fallback, so logging never blocks on the oracle.
pub fn resolve_assessment(result: Result<String, OracleError>, lang: Language) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => fallback_assessment(lang).to_string(),
        Err(e) => {
            warn!(error = %e, "assessment oracle failed; substituting fallback");
            fallback_assessment(lang).to_string()
        }
    }
}

/// The single mutating unit of meal logging: assess (best effort), upload
/// images, append exactly one entry.
pub async fn log_meal(
    st: &AppState,
    user_key: &str,
    draft: MealDraft,
) -> anyhow::Result<MealEntry> {
    let assessment = resolve_assessment(
        st.oracle
            .assess(&draft.description, &draft.images, draft.language)
            .await,
        draft.language,
    );

    let meal_id = Uuid::new_v4();
    let image_keys = upload_all(st, user_key, meal_id, &draft.images).await?;

    let entry = MealEntry {
        id: meal_id,
        user_key: user_key.to_string(),
        description: draft.description,
        portion: draft.portion,
        image_keys,
        assessment,
        created_at: OffsetDateTime::now_utc(),
    };
    repo::insert(&st.db, &entry).await?;
    Ok(entry)
}

#[cfg(test)]
mod draft_tests {
    use super::*;
    use crate::oracle::MARKER_HEALTHY;
    use bytes::Bytes;

    fn image() -> UploadItem {
        UploadItem {
            body: Bytes::from_static(b"fake"),
            content_type: "image/jpeg".into(),
        }
    }

    #[test]
    fn draft_needs_description_or_image() {
        let empty = MealDraft {
            description: "   ".into(),
            portion: PortionSize::Medium,
            images: vec![],
            language: Language::En,
        };
        assert!(empty.validate().is_err());

        let with_text = MealDraft {
            description: "chicken salad".into(),
            ..empty_draft()
        };
        assert!(with_text.validate().is_ok());

        let with_image = MealDraft {
            images: vec![image()],
            ..empty_draft()
        };
        assert!(with_image.validate().is_ok());
    }

    fn empty_draft() -> MealDraft {
        MealDraft {
            description: String::new(),
            portion: PortionSize::Medium,
            images: vec![],
            language: Language::En,
        }
    }

    #[test]
    fn oracle_text_is_kept_verbatim() {
        let out = resolve_assessment(Ok("Mostly protein. [H]".into()), Language::En);
        assert_eq!(out, "Mostly protein. [H]");
    }

    #[test]
    fn oracle_failure_becomes_fallback() {
        let out = resolve_assessment(Err(OracleError::Disabled), Language::En);
        assert_eq!(out, "Captured without live analysis. [H]");
        assert!(out.ends_with(MARKER_HEALTHY));
    }

    #[test]
    fn empty_oracle_text_becomes_fallback() {
        let out = resolve_assessment(Ok("  ".into()), Language::Ru);
        assert_eq!(out, "Записано без живого анализа. [H]");
    }
}
