//! Application Configuration
//!
//! Configuration for the notes application layer.

/// Notes application configuration
#[derive(Debug, Clone)]
pub struct NotesConfig {
    /// Largest accepted multipart body for uploads
    pub max_upload_bytes: usize,
    /// Base URL the blob store is publicly reachable at
    pub public_url: String,
    /// Bucket (top-level directory) attachments are written to
    pub bucket: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            public_url: "http://localhost:9000".to_string(),
            bucket: "notes".to_string(),
        }
    }
}

impl NotesConfig {
    pub fn development() -> Self {
        Self::default()
    }

    /// `{public_url}/{bucket}/{key}`
    pub fn file_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}
