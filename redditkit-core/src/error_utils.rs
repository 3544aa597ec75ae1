use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    /// Whether the failure is a transient network condition worth another attempt.
    fn is_retryable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    /// Stable identifier suitable for tool hosts and scripts.
    fn error_code(&self) -> &'static str;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        match self {
            CoreError::RedditApi(e) => {
                e.log_error();
            }
            CoreError::Config(e) => {
                e.log_error();
            }
            other => error!("Toolkit error [{}]: {}", other.error_code(), other),
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("Toolkit warning [{}]: {}", self.error_code(), self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::RedditApi(e) => e.is_retryable(),
            // Includes bodies cut off mid-transfer.
            CoreError::Network(e) => {
                e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
            }
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::RedditApi(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Could not reach Reddit. Check the network connection and try again.".to_string()
            }
            CoreError::Io(e) => format!("Could not read input: {}", e),
            CoreError::Serialization(e) => format!("Input is not valid JSON for a tool call: {}", e),
            CoreError::InvalidInput { message } => message.clone(),
            CoreError::MissingField { field } => format!(
                "Sentiment analysis needs flat records with a '{}' field; flatten post records first.",
                field
            ),
            CoreError::UnknownTool { name } => format!(
                "No tool is named '{}'. Run with empty input to list the available tools.",
                name
            ),
            CoreError::Internal { .. } => "Internal toolkit error.".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CoreError::RedditApi(_) => "REDDIT_API",
            CoreError::Config(_) => "CONFIG",
            CoreError::Io(_) => "IO",
            CoreError::Serialization(_) => "SERIALIZATION",
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
            CoreError::MissingField { .. } => "MISSING_FIELD",
            CoreError::UnknownTool { .. } => "UNKNOWN_TOOL",
            CoreError::Internal { .. } => "INTERNAL",
        }
    }
}

impl ErrorExt for RedditApiError {
    fn log_error(&self) -> &Self {
        error!("Reddit API error [{}]: {}", self.error_code(), self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("Reddit API warning [{}]: {}", self.error_code(), self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            RedditApiError::RateLimitExceeded { .. } | RedditApiError::RequestTimeout => true,
            RedditApiError::ServerError { status_code } => *status_code >= 500,
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } | RedditApiError::InvalidToken => {
                "Reddit rejected the app credentials. Check REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET."
                    .to_string()
            }
            RedditApiError::RateLimitExceeded { retry_after } => format!(
                "Reddit is rate limiting this app. Wait about {} seconds or raise the retry delay.",
                retry_after
            ),
            RedditApiError::Forbidden { resource } => {
                format!("Reddit denied access to {}; it may be private or quarantined.", resource)
            }
            RedditApiError::SubredditNotFound { subreddit } => {
                format!("Subreddit r/{} does not exist or is banned.", subreddit)
            }
            RedditApiError::PostNotFound { post_id } => {
                format!("Post {} was removed before its comments could be read.", post_id)
            }
            RedditApiError::RequestTimeout | RedditApiError::ServerError { .. } => {
                "Reddit is not responding right now. Try again later or raise the retry count."
                    .to_string()
            }
            RedditApiError::InvalidResponse { details } => {
                format!("Reddit returned data the toolkit could not read: {}", details)
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RedditApiError::AuthenticationFailed { .. } => "REDDIT_AUTH_FAILED",
            RedditApiError::RateLimitExceeded { .. } => "REDDIT_RATE_LIMIT",
            RedditApiError::Forbidden { .. } => "REDDIT_FORBIDDEN",
            RedditApiError::SubredditNotFound { .. } => "REDDIT_SUBREDDIT_NOT_FOUND",
            RedditApiError::PostNotFound { .. } => "REDDIT_POST_NOT_FOUND",
            RedditApiError::InvalidToken => "REDDIT_INVALID_TOKEN",
            RedditApiError::RequestTimeout => "REDDIT_TIMEOUT",
            RedditApiError::InvalidResponse { .. } => "REDDIT_INVALID_RESPONSE",
            RedditApiError::ServerError { .. } => "REDDIT_SERVER_ERROR",
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("Configuration error [{}]: {}", self.error_code(), self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("Configuration warning [{}]: {}", self.error_code(), self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("REDDIT_TOOLKIT_CONFIG points to '{}', which does not exist.", path)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("Setting '{}' cannot be '{}'.", field, value)
            }
            ConfigError::MissingEnvironmentVariable { var_name } => {
                format!("{} is not set; Reddit requests will fail to authenticate.", var_name)
            }
            ConfigError::Parse(e) => format!("Toolkit config is not valid TOML: {}", e),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::MissingEnvironmentVariable { .. } => "CONFIG_MISSING_ENV_VAR",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
        }
    }
}

/// Logs failures surfaced to the tool host.
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("{}", error.user_friendly_message());
    }
}
