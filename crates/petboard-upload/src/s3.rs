use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info, warn};

use crate::config::S3Config;
use crate::error::{UploadError, UploadResult};
use crate::key::ObjectKey;
use crate::traits::{PhotoUpload, PhotoUploader};

/// Uploads photos to an S3 bucket with a single `PutObject`.
///
/// Credentials come from the default AWS provider chain (environment,
/// shared profile, then the instance or task role), and the SDK signs every
/// request with them.
#[derive(Debug, Clone)]
pub struct S3Uploader {
    config: S3Config,
    client: Client,
}

impl S3Uploader {
    /// Build an uploader from the default AWS configuration chain.
    pub async fn load(config: S3Config) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self::from_sdk_config(config, &shared)
    }

    /// Build an uploader on top of an already loaded AWS configuration.
    ///
    /// `config.region` overrides the shared region, and `config.endpoint`
    /// switches the client to path-style requests against that endpoint.
    pub fn from_sdk_config(config: S3Config, shared: &SdkConfig) -> Self {
        let mut builder =
            aws_sdk_s3::config::Builder::from(shared).region(Region::new(config.region.clone()));
        if let Some(endpoint) = config.endpoint.as_deref() {
            builder = builder
                .endpoint_url(endpoint.trim_end_matches('/'))
                .force_path_style(true);
        }
        Self {
            client: Client::from_conf(builder.build()),
            config,
        }
    }

    pub fn config(&self) -> &S3Config {
        &self.config
    }

    async fn put_object(&self, key: &ObjectKey, photo: &PhotoUpload) -> UploadResult<String> {
        debug!(key = %key, bytes = photo.len(), bucket = %self.config.bucket, "uploading photo");
        // The whole buffer, from byte 0.
        let body = ByteStream::from(photo.data.clone());
        let result = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key.as_str())
            .content_type(&photo.content_type)
            .body(body)
            .send()
            .await;
        if let Err(e) = result {
            let e = UploadError::from(e);
            warn!(key = %key, error = %e, "photo upload rejected");
            return Err(e);
        }
        info!(key = %key, "photo uploaded");
        Ok(self.config.public_url(key))
    }
}

#[async_trait]
impl PhotoUploader for S3Uploader {
    async fn upload(&self, photo: &PhotoUpload) -> UploadResult<String> {
        let key = ObjectKey::generate(&self.config.folder, &photo.filename)?;
        self.put_object(&key, photo).await
    }
}
