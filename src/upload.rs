//! # Graphic Uploads
//!
//! The engine does not process images. It only decides whether a supplied
//! file is acceptable ([`UploadPolicy`]) and hands accepted bytes to an
//! [`AttachmentStore`], which returns the `(id, url)` pair recorded on the
//! personalization.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PaversError, Rejection};
use crate::record::GraphicRef;

/// Default upload limit: 5 MB.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Image types an engraver can work from.
pub const ALLOWED_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/svg+xml"];

/// Size and type limits for uploaded graphics.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Check a file, returning its effective MIME type.
    ///
    /// A missing or generic declared type is replaced by a guess from the
    /// file name.
    pub fn check(
        &self,
        filename: &str,
        content_type: Option<&str>,
        size: usize,
    ) -> Result<String, Rejection> {
        if size == 0 {
            return Err(Rejection::UploadFailed("the file is empty".to_string()));
        }
        if size > self.max_bytes {
            return Err(Rejection::UploadTooLarge {
                max_bytes: self.max_bytes,
            });
        }

        let mime = match content_type.map(str::trim) {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => {
                ct.to_ascii_lowercase()
            }
            _ => mime_guess::from_path(filename)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        if ALLOWED_TYPES.contains(&mime.as_str()) {
            Ok(mime)
        } else {
            Err(Rejection::UploadWrongType(mime))
        }
    }
}

/// A graphic held by a store.
#[derive(Debug, Clone)]
pub struct StoredGraphic {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// File-attachment collaborator.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist a checked file and return its reference.
    async fn store(&self, graphic: StoredGraphic) -> Result<GraphicRef, PaversError>;

    /// Look a graphic up by id.
    async fn fetch(&self, id: &str) -> Option<StoredGraphic>;

    /// True if a graphic with this id is stored.
    async fn contains(&self, id: &str) -> bool;
}

/// In-process store used by the HTTP server.
pub struct MemoryStore {
    base_url: String,
    graphics: RwLock<HashMap<Uuid, StoredGraphic>>,
}

impl MemoryStore {
    /// `base_url` prefixes the returned URLs, e.g. `/api/graphics`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            graphics: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.graphics.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.graphics.read().await.is_empty()
    }
}

#[async_trait]
impl AttachmentStore for MemoryStore {
    async fn store(&self, graphic: StoredGraphic) -> Result<GraphicRef, PaversError> {
        let id = Uuid::new_v4();
        self.graphics.write().await.insert(id, graphic);
        Ok(GraphicRef {
            id: id.to_string(),
            url: format!("{}/{}", self.base_url, id),
        })
    }

    async fn fetch(&self, id: &str) -> Option<StoredGraphic> {
        let id = Uuid::parse_str(id).ok()?;
        self.graphics.read().await.get(&id).cloned()
    }

    async fn contains(&self, id: &str) -> bool {
        match Uuid::parse_str(id) {
            Ok(id) => self.graphics.read().await.contains_key(&id),
            Err(_) => false,
        }
    }
}
