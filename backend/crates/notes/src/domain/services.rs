//! Domain Services
//!
//! Attachment naming.

use std::path::Path;

use kernel::id::BlobId;

/// Longest extension carried over from the uploaded file name
pub const MAX_EXTENSION_LENGTH: usize = 16;

/// Object key for an upload: a fresh UUID plus the original extension.
///
/// The extension is kept only when it is short and alphanumeric, so the key
/// never contains separators or dots beyond the one it adds.
pub fn blob_key(original_name: Option<&str>) -> String {
    format!("{}{}", BlobId::new(), extension(original_name))
}

fn extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LENGTH
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_keeps_extension() {
        let key = blob_key(Some("photo.JPG"));
        assert!(key.ends_with(".JPG"));
        assert_eq!(key.len(), 36 + 4);
    }

    #[test]
    fn test_key_without_usable_extension() {
        assert_eq!(blob_key(None).len(), 36);
        assert_eq!(blob_key(Some("README")).len(), 36);
        assert_eq!(blob_key(Some("x.tar/../../etc")).len(), 36);
        assert_eq!(blob_key(Some("evil.p h p")).len(), 36);
    }

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(blob_key(Some("a.txt")), blob_key(Some("a.txt")));
    }
}
