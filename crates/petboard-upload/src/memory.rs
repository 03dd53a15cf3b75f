use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::S3Config;
use crate::error::{UploadError, UploadResult};
use crate::key::ObjectKey;
use crate::traits::{PhotoUpload, PhotoUploader};

/// Uploader that keeps objects in memory.
///
/// URLs follow the same key scheme and public URL pattern as the S3
/// uploader. A [`failing`](InMemoryUploader::failing) uploader rejects every
/// call with a service error.
pub struct InMemoryUploader {
    config: S3Config,
    objects: Mutex<Vec<(ObjectKey, PhotoUpload)>>,
    failure: Option<String>,
}

impl InMemoryUploader {
    pub fn new() -> Self {
        Self::with_config(S3Config::default())
    }

    pub fn with_config(config: S3Config) -> Self {
        Self {
            config,
            objects: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// An uploader whose every upload fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Number of successful uploads.
    pub fn upload_count(&self) -> usize {
        self.objects.lock().expect("lock poisoned").len()
    }

    /// Keys of stored objects, in upload order.
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.objects
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Stored object for `key`, if any.
    pub fn get(&self, key: &ObjectKey) -> Option<PhotoUpload> {
        self.objects
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.clone())
    }
}

impl Default for InMemoryUploader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoUploader for InMemoryUploader {
    async fn upload(&self, photo: &PhotoUpload) -> UploadResult<String> {
        if let Some(message) = &self.failure {
            return Err(UploadError::Service {
                status: 503,
                message: message.clone(),
            });
        }
        let key = ObjectKey::generate(&self.config.folder, &photo.filename)?;
        let url = self.config.public_url(&key);
        self.objects
            .lock()
            .expect("lock poisoned")
            .push((key, photo.clone()));
        Ok(url)
    }
}

impl std::fmt::Debug for InMemoryUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUploader")
            .field("upload_count", &self.upload_count())
            .field("failing", &self.failure.is_some())
            .finish()
    }
}
