//! # Service Configuration
//!
//! Settings are read from an optional JSON file and then overridden field by
//! field from the command line or environment. Every section has defaults
//! except the JWT secret, which must come from somewhere.
//!
//! ```json
//! {
//!   "http": { "port": 3000, "cors_origins": ["http://localhost"] },
//!   "store": { "url": "memory://default" },
//!   "auth": { "jwt_secret": "...", "token_ttl_secs": 3600 },
//!   "pagination": { "page_size": 3 }
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::JwtConfig;
use crate::http_server::HttpServerConfig;
use crate::repository::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::store::StoreConfig;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("JWT secret is not set (use --jwt-secret, JWT_SECRET or auth.jwt_secret)")]
    MissingSecret,

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Token signing and lifetime settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_token_party")]
    pub issuer: String,

    #[serde(default = "default_token_party")]
    pub audience: String,
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_token_party() -> String {
    "catalog-api".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            issuer: default_token_party(),
            audience: default_token_party(),
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: Option<i64>,
    pub page_size: Option<u64>,
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub pagination: PaginationSettings,
}

impl ServiceConfig {
    /// Load configuration from file, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply overrides, then check the result
    pub fn resolve(mut self, overrides: ConfigOverrides) -> ConfigResult<Self> {
        if let Some(host) = overrides.host {
            self.http.host = host;
        }
        if let Some(port) = overrides.port {
            self.http.port = port;
        }
        if let Some(url) = overrides.database_url {
            self.store.url = url;
        }
        if let Some(secret) = overrides.jwt_secret {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(ttl) = overrides.token_ttl_secs {
            self.auth.token_ttl_secs = ttl;
        }
        if let Some(size) = overrides.page_size {
            self.pagination.page_size = size;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> ConfigResult<()> {
        match self.auth.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingSecret),
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_secs must be positive".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.pagination.page_size) {
            return Err(ConfigError::Invalid(format!(
                "pagination.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Token manager settings
    pub fn jwt_config(&self) -> ConfigResult<JwtConfig> {
        let secret = self
            .auth
            .jwt_secret
            .clone()
            .ok_or(ConfigError::MissingSecret)?;

        Ok(JwtConfig {
            secret,
            access_token_ttl: chrono::Duration::seconds(self.auth.token_ttl_secs),
            issuer: self.auth.issuer.clone(),
            audience: self.auth.audience.clone(),
        })
    }

    /// Copy safe to print: the secret is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.auth.jwt_secret.is_some() {
            copy.auth.jwt_secret = Some("<redacted>".to_string());
        }
        copy
    }
}
