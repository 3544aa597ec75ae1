pub mod api;
pub mod auth;
pub mod request;
pub mod retry;


pub use api::{HttpRedditApi, RedditApi};
pub use auth::{AccessToken, TokenProvider};
pub use request::{ApiRequest, PostComments, ResolveSubreddit, TopPosts};
pub use retry::{RetryExecutor, RetryPolicy};
