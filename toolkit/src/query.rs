use redditkit_core::CoreError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_POST_LIMIT: u32 = 5;
pub const DEFAULT_TOP_COMMENT_LIMIT: u32 = 5;
pub const DEFAULT_TRACKING_POST_LIMIT: u32 = 10;
pub const DEFAULT_TRACKING_COMMENT_LIMIT: u32 = 10;

/// Arguments of [`collect_top_posts`](crate::RedditToolkit::collect_top_posts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPostsQuery {
    pub subreddit_name: String,
    #[serde(default = "default_top_post_limit")]
    pub post_limit: u32,
    #[serde(default = "default_top_comment_limit")]
    pub comment_limit: u32,
}

/// Arguments of [`track_keyword_discussions`](crate::RedditToolkit::track_keyword_discussions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub subreddits: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(default = "default_tracking_post_limit")]
    pub post_limit: u32,
    #[serde(default = "default_tracking_comment_limit")]
    pub comment_limit: u32,
    #[serde(default)]
    pub sentiment_analysis: bool,
}

impl TopPostsQuery {
    pub fn new(subreddit_name: impl Into<String>) -> Self {
        Self {
            subreddit_name: subreddit_name.into(),
            post_limit: DEFAULT_TOP_POST_LIMIT,
            comment_limit: DEFAULT_TOP_COMMENT_LIMIT,
        }
    }

    pub fn with_limits(mut self, post_limit: u32, comment_limit: u32) -> Self {
        self.post_limit = post_limit;
        self.comment_limit = comment_limit;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        validate_limit("post_limit", self.post_limit)?;
        validate_limit("comment_limit", self.comment_limit)
    }
}

impl KeywordQuery {
    pub fn new<I, J, S, T>(subreddits: I, keywords: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            subreddits: subreddits.into_iter().map(Into::into).collect(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            post_limit: DEFAULT_TRACKING_POST_LIMIT,
            comment_limit: DEFAULT_TRACKING_COMMENT_LIMIT,
            sentiment_analysis: false,
        }
    }

    pub fn with_limits(mut self, post_limit: u32, comment_limit: u32) -> Self {
        self.post_limit = post_limit;
        self.comment_limit = comment_limit;
        self
    }

    pub fn with_sentiment_analysis(mut self, enabled: bool) -> Self {
        self.sentiment_analysis = enabled;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        validate_limit("post_limit", self.post_limit)?;
        validate_limit("comment_limit", self.comment_limit)
    }
}

fn validate_limit(field: &str, value: u32) -> Result<(), CoreError> {
    if value == 0 {
        return Err(CoreError::InvalidInput {
            message: format!("{} must be a positive integer", field),
        });
    }
    Ok(())
}

fn default_top_post_limit() -> u32 {
    DEFAULT_TOP_POST_LIMIT
}

fn default_top_comment_limit() -> u32 {
    DEFAULT_TOP_COMMENT_LIMIT
}

fn default_tracking_post_limit() -> u32 {
    DEFAULT_TRACKING_POST_LIMIT
}

fn default_tracking_comment_limit() -> u32 {
    DEFAULT_TRACKING_COMMENT_LIMIT
}
