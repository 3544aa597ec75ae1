//! Request descriptors.
//!
//! Each descriptor names one API operation together with its arguments, so the
//! retry executor can replay it without the caller building closures.

use crate::api::RedditApi;
use redditkit_core::{CommentHandle, CoreError, PostHandle, SubredditHandle};

#[allow(async_fn_in_trait)]
pub trait ApiRequest {
    type Output;

    /// Short human-readable name used in log lines.
    fn describe(&self) -> String;

    async fn send<A: RedditApi>(&self, api: &A) -> Result<Self::Output, CoreError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ResolveSubreddit<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct TopPosts<'a> {
    pub subreddit: &'a SubredditHandle,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PostComments<'a> {
    pub post: &'a PostHandle,
}

impl ApiRequest for ResolveSubreddit<'_> {
    type Output = SubredditHandle;

    fn describe(&self) -> String {
        format!("resolve r/{}", self.name)
    }

    async fn send<A: RedditApi>(&self, api: &A) -> Result<SubredditHandle, CoreError> {
        api.subreddit(self.name).await
    }
}

impl ApiRequest for TopPosts<'_> {
    type Output = Vec<PostHandle>;

    fn describe(&self) -> String {
        format!("top {} posts of r/{}", self.limit, self.subreddit.name)
    }

    async fn send<A: RedditApi>(&self, api: &A) -> Result<Vec<PostHandle>, CoreError> {
        api.top_posts(self.subreddit, self.limit).await
    }
}

impl ApiRequest for PostComments<'_> {
    type Output = Vec<CommentHandle>;

    fn describe(&self) -> String {
        format!("comments of post {}", self.post.id)
    }

    async fn send<A: RedditApi>(&self, api: &A) -> Result<Vec<CommentHandle>, CoreError> {
        api.comments(self.post).await
    }
}
