use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::state::AppState;

const PRESIGN_TTL_SECS: u64 = 30 * 60;

/// One decoded image ready for upload (and for the oracle prompt).
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Decode a base64 payload as produced by the clients: either a bare base64
/// string or a full data URL ("data:image/jpeg;base64,...").
pub fn decode_base64_image(raw: &str) -> anyhow::Result<UploadItem> {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let (content_type, data) = match raw.split_once(',') {
        Some((header, data)) if header.starts_with("data:") => {
            let mime = header
                .trim_start_matches("data:")
                .split(';')
                .next()
                .filter(|m| !m.is_empty())
                .unwrap_or("image/jpeg");
            (mime.to_string(), data)
        }
        _ => ("image/jpeg".to_string(), raw),
    };
    let bytes = STANDARD.decode(data).context("invalid base64 image")?;
    Ok(UploadItem {
        body: Bytes::from(bytes),
        content_type,
    })
}

/// Upload all images for a meal and return their storage keys in input order.
pub async fn upload_all(
    st: &AppState,
    user_key: &str,
    meal_id: Uuid,
    images: &[UploadItem],
) -> anyhow::Result<Vec<String>> {
    let mut keys = Vec::with_capacity(images.len());
    for img in images {
        let id = Uuid::new_v4();
        let ext = ext_from_mime(&img.content_type).unwrap_or("bin");
        let key = format!("meals/{}/{}-{}.{}", user_key, meal_id, id, ext);
        st.storage
            .put_object(&key, img.body.clone(), &img.content_type)
            .await
            .with_context(|| format!("put_object {}", key))?;
        keys.push(key);
    }
    Ok(keys)
}

pub async fn presign_many(st: &AppState, keys: &[String]) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::with_capacity(keys.len());
    for k in keys {
        out.push(st.storage.presign_get(k, PRESIGN_TTL_SECS).await?);
    }
    Ok(out)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod image_tests {
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(super::ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(super::ext_from_mime("image/png"), Some("png"));
        assert_eq!(super::ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(super::ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn decode_bare_base64_defaults_to_jpeg() {
        // "hello" in base64
        let item = super::decode_base64_image("aGVsbG8=").unwrap();
        assert_eq!(item.content_type, "image/jpeg");
        assert_eq!(item.body.as_ref(), b"hello");
    }

    #[test]
    fn decode_data_url_keeps_mime() {
        let item = super::decode_base64_image("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(item.content_type, "image/png");
        assert_eq!(item.body.as_ref(), b"hello");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(super::decode_base64_image("not base64 !!!").is_err());
    }

    #[tokio::test]
    async fn test_presign_many() {
        let state = AppState::fake();
        let urls = super::presign_many(&state, &["a/b/c.jpg".into(), "x/y/z.png".into()])
            .await
            .unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("a/b/c.jpg"));
        assert!(urls[1].contains("x/y/z.png"));
    }
}
