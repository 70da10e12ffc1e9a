use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::error::ApiError;
use crate::storage::StorageState;

/// InlineImage
///
/// An uploaded image decoded out of its browser data-URL envelope: raw bytes
/// plus the MIME type declared by the client.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// UploadedMedia
///
/// The result of a successful staging upload. `storage_key` is the path the
/// object store actually wrote (the same value rollback and later deletion
/// must use), `public_url` is what gets persisted on the content record.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    pub storage_key: String,
    pub public_url: String,
}

/// decode_data_url
///
/// Decodes a browser-standard data URL (`data:<mime>;base64,<payload>`) into
/// raw bytes. Any malformed envelope, undecodable payload, or empty result is
/// reported as the single validation failure "invalid image data", since the
/// client-side form is the only producer of this field.
pub fn decode_data_url(data_url: &str) -> Result<InlineImage, ApiError> {
    let invalid = || ApiError::Validation("invalid image data".to_string());

    let rest = data_url.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;

    // The header is "<mime>;base64"; anything after the first ';' is encoding
    // metadata we do not need beyond confirming base64.
    let content_type = header.split(';').next().unwrap_or("").to_string();
    if content_type.is_empty() || !header.contains("base64") {
        return Err(invalid());
    }

    let bytes = STANDARD.decode(payload.trim()).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }

    Ok(InlineImage {
        content_type,
        bytes,
    })
}

/// extension_for
///
/// Maps the declared MIME type to a file extension for the storage key.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

/// stage_inline_image
///
/// Step 1 of the create-with-media flow: decode the data URL and upload the
/// bytes under a collision-resistant key (`<prefix>-<millis>-<uuid>.<ext>`),
/// with overwrite forbidden. Returns the stored key and its public URL.
///
/// A bad payload is a `Validation` error raised before any storage call, an
/// upload failure is a `Storage` error with nothing to roll back.
pub async fn stage_inline_image(
    storage: &StorageState,
    key_prefix: &str,
    data_url: &str,
) -> Result<UploadedMedia, ApiError> {
    let image = decode_data_url(data_url)?;

    // Timestamp for human-readable ordering in the bucket, UUID so two
    // uploads in the same millisecond can never collide.
    let key = format!(
        "{}-{}-{}.{}",
        key_prefix,
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension_for(&image.content_type)
    );

    let storage_key = storage
        .put(&key, &image.bytes, &image.content_type, false)
        .await
        .map_err(ApiError::Storage)?;

    let public_url = storage.public_url(&storage_key);

    Ok(UploadedMedia {
        storage_key,
        public_url,
    })
}

/// discard_staged
///
/// Best-effort removal of an already-uploaded blob, used both for rollback
/// after a failed insert and for cleanup after a record delete. A failure here
/// is logged and swallowed: the caller's outcome is already decided, and an
/// orphaned blob is a storage-cost nuisance, not a correctness violation.
pub async fn discard_staged(storage: &StorageState, storage_key: &str) {
    if let Err(e) = storage.remove(&[storage_key.to_string()]).await {
        tracing::error!(key = %storage_key, "best-effort blob removal failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockObjectStore;
    use std::sync::Arc;

    // "hello png" base64-encoded.
    const PAYLOAD: &str = "aGVsbG8gcG5n";

    #[test]
    fn decodes_well_formed_data_url() {
        let image = decode_data_url(&format!("data:image/png;base64,{}", PAYLOAD)).unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes, b"hello png");
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(decode_data_url(&format!("image/png;base64,{}", PAYLOAD)).is_err());
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(decode_data_url("data:image/png;base64,@@not-base64@@").is_err());
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(decode_data_url("data:image/png;base64,").is_err());
    }

    #[tokio::test]
    async fn stages_upload_under_prefixed_key() {
        let mock = MockObjectStore::new();
        let storage: StorageState = Arc::new(mock.clone());

        let media = stage_inline_image(
            &storage,
            "gallery-Photos",
            &format!("data:image/jpeg;base64,{}", PAYLOAD),
        )
        .await
        .unwrap();

        assert!(media.storage_key.starts_with("gallery-Photos-"));
        assert!(media.storage_key.ends_with(".jpg"));
        assert!(media.public_url.contains(&media.storage_key));
        assert_eq!(mock.uploaded_keys(), vec![media.storage_key.clone()]);
    }

    #[tokio::test]
    async fn upload_failure_is_storage_error_without_rollback() {
        let mock = MockObjectStore::failing_put();
        let storage: StorageState = Arc::new(mock.clone());

        let result = stage_inline_image(
            &storage,
            "gallery-Photos",
            &format!("data:image/jpeg;base64,{}", PAYLOAD),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Storage(_))));
        // Nothing was stored, so nothing may be removed.
        assert!(mock.removed_keys().is_empty());
    }

    #[tokio::test]
    async fn discard_swallows_removal_failure() {
        let mock = MockObjectStore::failing_remove();
        let storage: StorageState = Arc::new(mock.clone());

        // Must not panic or propagate; the call is still recorded.
        discard_staged(&storage, "gallery-Photos-123.jpg").await;
        assert_eq!(mock.removed_keys(), vec!["gallery-Photos-123.jpg".to_string()]);
    }
}
