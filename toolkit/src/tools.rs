//! Tool descriptors and dispatch for agent frameworks.
//!
//! Each toolkit operation is published as a [`ToolDescriptor`] (name,
//! description, JSON schema of its parameters and of its result). A framework
//! lists them with [`RedditToolkit::get_tools`] and calls them back through
//! [`RedditToolkit::invoke`].

use crate::query::{
    KeywordQuery, TopPostsQuery, DEFAULT_TOP_COMMENT_LIMIT, DEFAULT_TOP_POST_LIMIT,
    DEFAULT_TRACKING_COMMENT_LIMIT, DEFAULT_TRACKING_POST_LIMIT,
};
use crate::sentiment::{COMMENT_BODY_FIELD, SENTIMENT_SCORE_FIELD};
use crate::RedditToolkit;
use reddit_client::RedditApi;
use redditkit_core::CoreError;
use sentiment_engine::PolarityScorer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

pub const COLLECT_TOP_POSTS: &str = "collect_top_posts";
pub const PERFORM_SENTIMENT_ANALYSIS: &str = "perform_sentiment_analysis";
pub const TRACK_KEYWORD_DISCUSSIONS: &str = "track_keyword_discussions";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
    pub returns: Value,
}

/// A request from the framework to run one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SentimentArguments {
    data: Vec<Map<String, Value>>,
}

impl<A, S> RedditToolkit<A, S>
where
    A: RedditApi,
    S: PolarityScorer,
{
    pub fn get_tools(&self) -> Vec<ToolDescriptor> {
        descriptors()
    }

    /// Runs the named tool with JSON arguments and returns its JSON result.
    pub async fn invoke(&self, call: &ToolCall) -> Result<Value, CoreError> {
        debug!("Invoking tool {}", call.name);

        match call.name.as_str() {
            COLLECT_TOP_POSTS => {
                let query: TopPostsQuery = parse_arguments(call)?;
                Ok(serde_json::to_value(self.collect_top_posts(&query).await?)?)
            }
            PERFORM_SENTIMENT_ANALYSIS => {
                let arguments: SentimentArguments = parse_arguments(call)?;
                let scored = self.perform_sentiment_analysis(arguments.data)?;
                Ok(Value::Array(scored.into_iter().map(Value::Object).collect()))
            }
            TRACK_KEYWORD_DISCUSSIONS => {
                let query: KeywordQuery = parse_arguments(call)?;
                Ok(serde_json::to_value(
                    self.track_keyword_discussions(&query).await?,
                )?)
            }
            other => Err(CoreError::UnknownTool {
                name: other.to_string(),
            }),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(call: &ToolCall) -> Result<T, CoreError> {
    let arguments = match &call.arguments {
        Value::Null => Value::Object(Map::new()),
        arguments => arguments.clone(),
    };

    serde_json::from_value(arguments).map_err(|e| CoreError::InvalidInput {
        message: format!("Invalid arguments for {}: {}", call.name, e),
    })
}

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        collect_top_posts_descriptor(),
        perform_sentiment_analysis_descriptor(),
        track_keyword_discussions_descriptor(),
    ]
}

fn comment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            COMMENT_BODY_FIELD: { "type": "string" },
            "Upvotes": { "type": "integer" }
        },
        "required": [COMMENT_BODY_FIELD, "Upvotes"]
    })
}

fn limit_schema(description: &str, default: u32) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "default": default,
        "description": description
    })
}

fn collect_top_posts_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: COLLECT_TOP_POSTS,
        description: "Collects the top posts and their comments from a specified subreddit.",
        parameters: json!({
            "type": "object",
            "properties": {
                "subreddit_name": {
                    "type": "string",
                    "description": "The name of the subreddit to collect posts from. Names joined with '+' (e.g. 'rust+golang') read several subreddits as one."
                },
                "post_limit": limit_schema(
                    "The maximum number of top posts to collect.",
                    DEFAULT_TOP_POST_LIMIT
                ),
                "comment_limit": limit_schema(
                    "The maximum number of top comments to collect per post.",
                    DEFAULT_TOP_COMMENT_LIMIT
                )
            },
            "required": ["subreddit_name"]
        }),
        returns: json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "Post Title": { "type": "string" },
                    "Comments": { "type": "array", "items": comment_schema() }
                },
                "required": ["Post Title", "Comments"]
            }
        }),
    }
}

fn perform_sentiment_analysis_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: PERFORM_SENTIMENT_ANALYSIS,
        description: "Performs sentiment analysis on flat comment records, adding a \
                      'Sentiment Score' between -1.0 and 1.0 to each record.",
        parameters: json!({
            "type": "object",
            "properties": {
                "data": {
                    "type": "array",
                    "description": "Flat comment records, each with a 'Comment Body' field.",
                    "items": {
                        "type": "object",
                        "properties": { COMMENT_BODY_FIELD: { "type": "string" } },
                        "required": [COMMENT_BODY_FIELD]
                    }
                }
            },
            "required": ["data"]
        }),
        returns: json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    COMMENT_BODY_FIELD: { "type": "string" },
                    SENTIMENT_SCORE_FIELD: { "type": "number", "minimum": -1.0, "maximum": 1.0 }
                },
                "required": [COMMENT_BODY_FIELD, SENTIMENT_SCORE_FIELD]
            }
        }),
    }
}

fn track_keyword_discussions_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TRACK_KEYWORD_DISCUSSIONS,
        description: "Tracks discussions about specific keywords in specified subreddits.",
        parameters: json!({
            "type": "object",
            "properties": {
                "subreddits": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of subreddit names to search within."
                },
                "keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Keywords to look for, matched case-insensitively."
                },
                "post_limit": limit_schema(
                    "The maximum number of top posts to collect per subreddit.",
                    DEFAULT_TRACKING_POST_LIMIT
                ),
                "comment_limit": limit_schema(
                    "The maximum number of top comments to collect per post.",
                    DEFAULT_TRACKING_COMMENT_LIMIT
                ),
                "sentiment_analysis": {
                    "type": "boolean",
                    "default": false,
                    "description": "If true, adds a sentiment score to every matching comment."
                }
            },
            "required": ["subreddits", "keywords"]
        }),
        returns: json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "Subreddit": { "type": "string" },
                    "Post Title": { "type": "string" },
                    COMMENT_BODY_FIELD: { "type": "string" },
                    "Upvotes": { "type": "integer" },
                    SENTIMENT_SCORE_FIELD: { "type": "number", "minimum": -1.0, "maximum": 1.0 }
                },
                "required": ["Subreddit", "Post Title", COMMENT_BODY_FIELD, "Upvotes"]
            }
        }),
    }
}
