//! Server settings loaded via OrthoConfig.
//!
//! Values come from `RELIEF_*` environment variables, CLI flags, or a config
//! file. `port` carries a declared default so an empty environment still
//! loads; the remaining fields are optional and accessors supply defaults.

use std::net::SocketAddr;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "assignment";
const DEFAULT_TOKEN_TTL: &str = "1h";
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Errors raised while turning raw settings into server inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(String),
    #[error("invalid bind address {0}")]
    BindAddress(String),
    #[error("invalid token ttl {0:?}; expected <n>[s|m|h|d]")]
    TokenTtl(String),
    #[error("RELIEF_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RELIEF")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 5000)]
    pub port: u16,
    /// MongoDB connection string. The in-memory store is used when unset.
    pub mongodb_uri: Option<String>,
    /// Database holding every collection.
    pub database: Option<String>,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime such as `30m` or `1h`.
    pub token_ttl: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            mongodb_uri: None,
            database: None,
            jwt_secret: None,
            token_ttl: None,
        }
    }
}

impl AppSettings {
    /// Load from the process arguments and environment.
    pub fn load_from_env() -> Result<Self, SettingsError> {
        Self::load().map_err(|err| SettingsError::Load(err.to_string()))
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// The MongoDB URI, ignoring blank values.
    pub fn mongodb_uri(&self) -> Option<&str> {
        self.mongodb_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = format!("{}:{}", self.host(), self.port());
        raw.parse().map_err(|_| SettingsError::BindAddress(raw))
    }

    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        parse_ttl(self.token_ttl.as_deref().unwrap_or(DEFAULT_TOKEN_TTL))
    }

    /// The configured signing secret.
    ///
    /// Debug builds fall back to a random per-process secret, so tokens do
    /// not survive a restart. Release builds refuse to start without one.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        if let Some(secret) = self.jwt_secret.as_deref().filter(|s| !s.trim().is_empty()) {
            return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
        }
        if cfg!(debug_assertions) {
            warn!("RELIEF_JWT_SECRET unset; using an ephemeral signing secret (dev only)");
            let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
            OsRng.fill_bytes(bytes.as_mut_slice());
            return Ok(bytes);
        }
        Err(SettingsError::MissingJwtSecret)
    }
}

/// Parse `<n>[s|m|h|d]`. A bare number is read as seconds.
pub fn parse_ttl(raw: &str) -> Result<Duration, SettingsError> {
    let invalid = || SettingsError::TokenTtl(raw.to_owned());
    let trimmed = raw.trim();
    let (digits, unit) = match trimmed.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&trimmed[..idx], c),
        Some(_) => (trimmed, 's'),
        None => return Err(invalid()),
    };
    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }
    let duration = match unit.to_ascii_lowercase() {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}
