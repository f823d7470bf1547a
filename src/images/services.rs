use anyhow::Context;
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug)]
pub struct UploadedImage {
    pub key: String,
    pub url: String,
}

/// Decode a client-supplied image payload into raw bytes and a content type.
///
/// Accepts a `data:<mime>;base64,<data>` URI or a bare base64 string
/// (treated as `application/octet-stream`).
pub fn decode_image_payload(payload: &str) -> anyhow::Result<(Bytes, String)> {
    let payload = payload.trim();
    if let Some(rest) = payload.strip_prefix("data:") {
        let (mime, data) = rest
            .split_once(";base64,")
            .context("malformed data URI, expected ;base64, section")?;
        let bytes = Base64::decode_vec(data)
            .map_err(|e| anyhow::anyhow!("invalid base64 in data URI: {e}"))?;
        Ok((Bytes::from(bytes), mime.to_string()))
    } else {
        let bytes = Base64::decode_vec(payload)
            .map_err(|e| anyhow::anyhow!("invalid base64 payload: {e}"))?;
        Ok((Bytes::from(bytes), "application/octet-stream".to_string()))
    }
}

/// Store decoded image bytes and return the storage key and permanent URL.
pub async fn store_image(
    st: &AppState,
    folder: &str,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<UploadedImage> {
    anyhow::ensure!(!body.is_empty(), "empty image payload");

    let id = Uuid::new_v4();
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    let key = format!("{}/{}.{}", folder, id, ext);

    st.storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;

    let url = st.storage.public_url(&key);
    Ok(UploadedImage { key, url })
}

/// Best-effort removal of an uploaded object, e.g. when the record that
/// should reference it failed to persist. Failures are logged, not returned.
pub async fn discard_image(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        warn!(error = %e, %key, "failed to remove uploaded object");
    }
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
