use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use petboard_upload::S3Config;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable holding the flash-cookie signing secret.
pub const SECRET_KEY_ENV: &str = "PETBOARD_SECRET_KEY";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// The persisted document.
    pub data_file: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    pub s3: S3Config,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            data_file: PathBuf::from("pets.json"),
            max_upload_bytes: 16 * 1024 * 1024,
            s3: S3Config::default(),
        }
    }
}

impl ServerConfig {
    /// Load a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }
}
