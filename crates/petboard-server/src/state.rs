use std::sync::Arc;

use petboard_store::RecordStore;
use petboard_upload::PhotoUploader;

use crate::flash::FlashKey;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub uploader: Arc<dyn PhotoUploader>,
    pub flash_key: FlashKey,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        uploader: Arc<dyn PhotoUploader>,
        flash_key: FlashKey,
    ) -> Self {
        Self {
            store,
            uploader,
            flash_key,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }

    #[must_use]
    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
