use serde::{Deserialize, Serialize};

use crate::key::ObjectKey;

/// Object storage location for uploaded photos.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Key prefix, ending in `/`.
    pub folder: String,
    /// Path-style endpoint override (for S3-compatible stores). When unset,
    /// the regional virtual-hosted endpoint is used.
    pub endpoint: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: "pet-adoption-uploads".into(),
            region: "us-east-2".into(),
            folder: "img/".into(),
            endpoint: None,
        }
    }
}

impl S3Config {
    /// URL the object is written to and later served from.
    pub fn public_url(&self, key: &ObjectKey) -> String {
        match self.endpoint.as_deref() {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket,
                key.as_str()
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket,
                self.region,
                key.as_str()
            ),
        }
    }
}
