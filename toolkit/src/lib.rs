//! Agent-facing Reddit toolkit.
//!
//! Wraps a [`RedditApi`](reddit_client::RedditApi) with retries and exposes
//! three tools: collecting top posts, scoring comment sentiment, and tracking
//! keyword mentions across subreddits.

pub mod query;
pub mod records;
pub mod sentiment;
pub mod toolkit;
pub mod tools;

mod tests;

pub use query::{
    KeywordQuery, TopPostsQuery, DEFAULT_TOP_COMMENT_LIMIT, DEFAULT_TOP_POST_LIMIT,
    DEFAULT_TRACKING_COMMENT_LIMIT, DEFAULT_TRACKING_POST_LIMIT,
};
pub use records::{CommentRecord, KeywordMention, PostRecord};
pub use sentiment::{score_records, Scorable, COMMENT_BODY_FIELD, SENTIMENT_SCORE_FIELD};
pub use sentiment_engine::{LexiconAnalyzer, PolarityScorer};
pub use toolkit::RedditToolkit;
pub use tools::{
    descriptors, ToolCall, ToolDescriptor, COLLECT_TOP_POSTS, PERFORM_SENTIMENT_ANALYSIS,
    TRACK_KEYWORD_DISCUSSIONS,
};
