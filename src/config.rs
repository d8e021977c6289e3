//! Configuration loaded from the process environment

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://gql.hashnode.com/";

/// Default output root when `BACKUP_PATH` is unset
pub const DEFAULT_BACKUP_PATH: &str = "posts";

/// Default per-image request timeout in seconds
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 10;

/// API token (required)
pub const ENV_TOKEN: &str = "HASHNODE_TOKEN";
/// Hashnode username whose publications are backed up (required)
pub const ENV_USERNAME: &str = "HASHNODE_USERNAME";
/// Public blog host used for canonical URLs (required)
pub const ENV_BLOG_URL: &str = "HASHNODE_BLOG_URL";
/// Output root directory (optional)
pub const ENV_BACKUP_PATH: &str = "BACKUP_PATH";
/// GraphQL endpoint override (optional)
pub const ENV_API_URL: &str = "HASHNODE_API";
/// Image timeout override in seconds (optional)
pub const ENV_IMAGE_TIMEOUT: &str = "IMAGE_TIMEOUT_SECS";

const REQUIRED: [&str; 3] = [ENV_TOKEN, ENV_USERNAME, ENV_BLOG_URL];

/// Immutable run configuration
///
/// Built once at startup and passed by reference into every component.
#[derive(Clone)]
pub struct Config {
    /// GraphQL endpoint
    pub api_url: String,
    /// Raw API token, sent as the `Authorization` header without a scheme
    pub token: String,
    /// Username whose posts are fetched
    pub username: String,
    /// Blog host, e.g. `blog.example.com`
    pub blog_host: String,
    /// Root directory for the backup tree
    pub backup_path: PathBuf,
    /// Timeout applied to each image download
    pub image_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("blog_host", &self.blog_host)
            .field("backup_path", &self.backup_path)
            .field("image_timeout", &self.image_timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    ///
    /// # Errors
    /// Returns [`Error::MissingEnv`] naming every required variable that is absent or empty.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|name| get(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingEnv { names: missing });
        }

        let image_timeout = match get(ENV_IMAGE_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    default = DEFAULT_IMAGE_TIMEOUT_SECS,
                    "invalid {}, using default",
                    ENV_IMAGE_TIMEOUT
                );
                DEFAULT_IMAGE_TIMEOUT_SECS
            }),
            None => DEFAULT_IMAGE_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: get(ENV_TOKEN).unwrap_or_default(),
            username: get(ENV_USERNAME).unwrap_or_default(),
            blog_host: get(ENV_BLOG_URL).unwrap_or_default(),
            backup_path: get(ENV_BACKUP_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_PATH)),
            image_timeout: Duration::from_secs(image_timeout),
        })
    }

    /// Log the effective configuration (the token is never logged)
    pub fn log_summary(&self) {
        tracing::info!(
            api_url = %self.api_url,
            username = %self.username,
            blog_url = %self.blog_host,
            backup_path = %self.backup_path.display(),
            "configuration"
        );
    }
}
