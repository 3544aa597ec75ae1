//! Runtime configuration: Reddit credentials from the environment and
//! toolkit tuning (retries, delays, endpoints) from an optional TOML file.

use crate::error::{ConfigError, CoreError};
use crate::error_utils::ErrorExt;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";
pub const CONFIG_PATH_VAR: &str = "REDDIT_TOOLKIT_CONFIG";

pub const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";
pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Application credentials for the Reddit API.
///
/// Missing values are tolerated at construction time; the failure surfaces as
/// an authentication error on the first real request.
#[derive(Clone, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client_id,
            client_secret,
            user_agent,
        }
    }

    /// Reads `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET` and `REDDIT_USER_AGENT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable source, warning about
    /// every value that is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| match lookup(name).filter(|value| !value.is_empty()) {
            Some(value) => value,
            None => {
                ConfigError::MissingEnvironmentVariable {
                    var_name: name.to_string(),
                }
                .log_warn();
                String::new()
            }
        };

        let credentials = Self::new(
            read(CLIENT_ID_VAR),
            read(CLIENT_SECRET_VAR),
            read(USER_AGENT_VAR),
        );

        if !credentials.is_complete() {
            warn!("Reddit API credentials are not set. Please set the environment variables.");
        }
        credentials
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.user_agent.is_empty()
    }
}

impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolkitConfig {
    /// Total attempts per API request, including the first one.
    pub retries: u32,
    /// Pause between retry attempts and after every processed post.
    pub delay_secs: f64,
    pub request_timeout_secs: u64,
    pub api_base_url: Url,
    pub token_url: Url,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            delay_secs: 0.0,
            request_timeout_secs: 30,
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid"),
            token_url: Url::parse(DEFAULT_TOKEN_URL).expect("default token URL is valid"),
        }
    }
}

impl ToolkitConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ToolkitConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::Config(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }),
            _ => CoreError::Io(e),
        })?;

        let config = Self::from_toml_str(&contents)?;
        debug!("Loaded toolkit configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `REDDIT_TOOLKIT_CONFIG`, or the defaults when unset.
    pub fn load() -> Result<Self, CoreError> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => {
                info!("{} not set, using default toolkit configuration", CONFIG_PATH_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Duration::try_from_secs_f64(self.delay_secs).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "delay_secs".to_string(),
                value: self.delay_secs.to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: self.request_timeout_secs.to_string(),
            });
        }
        Ok(())
    }

    /// Values rejected by [`validate`](Self::validate) read as zero.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
