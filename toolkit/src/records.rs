//! Output records. Field names are part of the tool contract and serialize
//! exactly as agents see them.

use redditkit_core::CommentHandle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "Post Title")]
    pub title: String,
    #[serde(rename = "Comments")]
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "Comment Body")]
    pub body: String,
    #[serde(rename = "Upvotes")]
    pub upvotes: i64,
}

/// One comment that matched a tracked keyword, flattened with its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMention {
    #[serde(rename = "Subreddit")]
    pub subreddit: String,
    #[serde(rename = "Post Title")]
    pub post_title: String,
    #[serde(rename = "Comment Body")]
    pub comment_body: String,
    #[serde(rename = "Upvotes")]
    pub upvotes: i64,
    #[serde(
        rename = "Sentiment Score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sentiment_score: Option<f64>,
}

impl From<CommentHandle> for CommentRecord {
    fn from(comment: CommentHandle) -> Self {
        Self {
            body: comment.body,
            upvotes: comment.score,
        }
    }
}
