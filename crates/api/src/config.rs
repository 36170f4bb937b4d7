//! Configuration loaded from environment variables.

use rusher_core::error::CoreError;

/// Server configuration.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}

/// Image-generation provider credentials.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer credential injected into every provider call. Never sent
    /// to clients.
    pub api_token: String,
}

impl ProviderConfig {
    /// Read `REPLICATE_API_TOKEN`. Absence or an empty value is a
    /// configuration error, surfaced before any network attempt.
    pub fn from_env() -> Result<Self, CoreError> {
        match std::env::var("REPLICATE_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Ok(Self { api_token: token }),
            _ => Err(CoreError::Configuration(
                "REPLICATE_API_TOKEN is not configured".to_string(),
            )),
        }
    }
}

/// Asset host account configuration.
#[derive(Debug, Clone)]
pub struct AssetHostConfig {
    /// Cloud account identifier (`CLOUDINARY_CLOUD_NAME`, required).
    pub cloud_name: String,
    /// Unsigned upload preset (`CLOUDINARY_UPLOAD_PRESET`, default
    /// `ml_default`).
    pub upload_preset: String,
    /// Admin credentials, only needed for asset deletion.
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl AssetHostConfig {
    /// Read the asset host account from the environment. A missing
    /// cloud name is a configuration error.
    pub fn from_env() -> Result<Self, CoreError> {
        let cloud_name = match std::env::var("CLOUDINARY_CLOUD_NAME") {
            Ok(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(CoreError::Configuration(
                    "CLOUDINARY_CLOUD_NAME is not configured".to_string(),
                ))
            }
        };

        Ok(Self {
            cloud_name,
            upload_preset: std::env::var("CLOUDINARY_UPLOAD_PRESET")
                .unwrap_or_else(|_| "ml_default".into()),
            api_key: std::env::var("CLOUDINARY_API_KEY").ok(),
            api_secret: std::env::var("CLOUDINARY_API_SECRET").ok(),
        })
    }
}
