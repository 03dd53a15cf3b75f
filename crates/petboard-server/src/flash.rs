//! One-shot notices carried across a redirect.
//!
//! Notices live in a single cookie, `<hex json>.<hex hmac-sha256>`. A cookie
//! whose signature does not verify is ignored. The listing page clears the
//! cookie once it has shown the notices.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::SECRET_KEY_ENV;

pub const FLASH_COOKIE: &str = "petboard_flash";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.into(),
        }
    }
}

/// Secret used to sign the flash cookie.
#[derive(Clone)]
pub struct FlashKey(Vec<u8>);

impl FlashKey {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// A random 32-byte key, valid for the life of the process.
    pub fn random() -> Self {
        let mut key = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    /// Key from `PETBOARD_SECRET_KEY`, or a random one when unset.
    pub fn from_env() -> Self {
        match std::env::var(SECRET_KEY_ENV) {
            Ok(secret) if !secret.is_empty() => Self::new(secret.into_bytes()),
            _ => {
                tracing::warn!(
                    "{SECRET_KEY_ENV} not set; flash cookies will not survive a restart"
                );
                Self::random()
            }
        }
    }

    fn mac(&self) -> Option<Hmac<Sha256>> {
        Hmac::<Sha256>::new_from_slice(&self.0).ok()
    }

    /// Encode and sign notices as a cookie value.
    ///
    /// Returns an empty value when no MAC can be built from the key; an empty
    /// cookie reads back as no notices.
    pub fn encode(&self, flashes: &[Flash]) -> String {
        let Some(mut mac) = self.mac() else {
            tracing::warn!("flash key rejected by hmac; dropping notices");
            return String::new();
        };
        let json = serde_json::to_vec(flashes).unwrap_or_else(|_| b"[]".to_vec());
        let payload = hex::encode(json);
        mac.update(payload.as_bytes());
        let sig = hex::encode(mac.finalize().into_bytes());
        format!("{payload}.{sig}")
    }

    /// Verify and decode a cookie value. Bad signatures decode to nothing.
    pub fn decode(&self, value: &str) -> Vec<Flash> {
        let Some((payload, sig)) = value.split_once('.') else {
            return Vec::new();
        };
        let Ok(sig) = hex::decode(sig) else {
            return Vec::new();
        };
        let Some(mut mac) = self.mac() else {
            return Vec::new();
        };
        mac.update(payload.as_bytes());
        if mac.verify_slice(&sig).is_err() {
            tracing::debug!("discarding flash cookie with bad signature");
            return Vec::new();
        }
        hex::decode(payload)
            .ok()
            .and_then(|json| serde_json::from_slice(&json).ok())
            .unwrap_or_default()
    }

    /// Notices carried by the request, if any.
    pub fn read(&self, headers: &HeaderMap) -> Vec<Flash> {
        cookie_value(headers, FLASH_COOKIE)
            .map(|v| self.decode(&v))
            .unwrap_or_default()
    }

    /// `Set-Cookie` value storing `flashes`.
    pub fn set_cookie(&self, flashes: &[Flash]) -> HeaderValue {
        let value = format!(
            "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.encode(flashes)
        );
        HeaderValue::from_str(&value).unwrap_or_else(|_| clear_cookie())
    }
}

impl std::fmt::Debug for FlashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FlashKey(..)")
    }
}

/// `Set-Cookie` value that removes the flash cookie.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("petboard_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Whether the request carries a flash cookie at all.
pub fn has_flash_cookie(headers: &HeaderMap) -> bool {
    cookie_value(headers, FLASH_COOKIE).is_some()
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}
