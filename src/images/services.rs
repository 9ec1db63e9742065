use anyhow::Context;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

/// How long a presigned image URL stays valid.
pub const PRESIGN_TTL_SECS: u64 = 10 * 60;

/// An uploaded image, as received from the client.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

pub fn entry_image_key(user_id: Uuid, entry_id: Uuid, ext: &str) -> String {
    format!("entries/{user_id}/{entry_id}.{ext}")
}

/// Stores the image of entry `entry_id` and returns its object key.
pub async fn upload_entry_image(
    st: &AppState,
    user_id: Uuid,
    entry_id: Uuid,
    image: &UploadItem,
) -> anyhow::Result<String> {
    let ext = ext_from_mime(&image.content_type)
        .with_context(|| format!("unsupported image type {}", image.content_type))?;
    let key = entry_image_key(user_id, entry_id, ext);
    st.storage
        .put_object(&key, image.body.clone(), &image.content_type)
        .await?;
    Ok(key)
}

pub async fn presign_entry_image(st: &AppState, key: &str) -> anyhow::Result<String> {
    st.storage
        .presign_get(key, PRESIGN_TTL_SECS)
        .await
        .with_context(|| format!("presign url for {key}"))
}

/// Deletes an image that no entry references any more. Failures only leave
/// an orphaned object behind, so they are logged and swallowed.
pub async fn discard_image(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        warn!(error = %format!("{e:#}"), %key, "failed to delete entry image");
    }
}
