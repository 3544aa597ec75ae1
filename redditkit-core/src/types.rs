use serde::{Deserialize, Serialize};

/// A subreddit resolved by the API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditHandle {
    pub name: String,
}

/// A post as ranked by the API. `id` is the base36 id without the `t3_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostHandle {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentHandle {
    pub body: String,
    pub score: i64,
}

impl SubredditHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PostHandle {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

impl CommentHandle {
    pub fn new(body: impl Into<String>, score: i64) -> Self {
        Self {
            body: body.into(),
            score,
        }
    }
}
