use crate::auth::TokenProvider;
use redditkit_core::{
    CommentHandle, CoreError, PostHandle, RedditApiError, RedditCredentials, SubredditHandle,
    ToolkitConfig,
};
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use url::Url;

/// The capability set the toolkit needs from a Reddit client.
///
/// [`HttpRedditApi`] talks to the real API; tests substitute in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait RedditApi {
    /// Resolves a subreddit by name.
    async fn subreddit(&self, name: &str) -> Result<SubredditHandle, CoreError>;

    /// Fetches up to `limit` posts in the subreddit's all-time "top" ranking.
    async fn top_posts(
        &self,
        subreddit: &SubredditHandle,
        limit: u32,
    ) -> Result<Vec<PostHandle>, CoreError>;

    /// Fetches the top-level comments of a post in the API's default order.
    async fn comments(&self, post: &PostHandle) -> Result<Vec<CommentHandle>, CoreError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing<C> {
    pub kind: String,
    pub data: RedditListingData<C>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData<C> {
    pub children: Vec<C>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCommentData {
    pub body: String,
    pub score: i64,
}

/// A child of a comment listing. "more" stubs stand in for comments that
/// were not expanded in the response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum RedditCommentThing {
    #[serde(rename = "t1")]
    Comment(RedditCommentData),
    #[serde(rename = "more")]
    More(IgnoredAny),
}

pub type PostListing = RedditListing<RedditListingChild<RedditPostData>>;
pub type CommentListing = RedditListing<RedditCommentThing>;

#[derive(Debug)]
pub struct HttpRedditApi {
    http_client: Client,
    tokens: TokenProvider,
    api_base: Url,
    user_agent: String,
}

impl HttpRedditApi {
    /// Builds the client. No network traffic happens until the first request.
    pub fn new(credentials: RedditCredentials, config: &ToolkitConfig) -> Result<Self, CoreError> {
        // Reddit redirects unknown subreddits to a search page.
        let http_client = Client::builder()
            .user_agent(&credentials.user_agent)
            .timeout(config.request_timeout())
            .redirect(Policy::none())
            .build()?;

        let tokens = TokenProvider::new(&credentials, &config.token_url, http_client.clone())?;

        Ok(Self {
            http_client,
            tokens,
            api_base: config.api_base_url.clone(),
            user_agent: credentials.user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base.as_str().trim_end_matches('/'), endpoint)
    }

    async fn make_request(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        not_found: RedditApiError,
    ) -> Result<Response, CoreError> {
        let access_token = self.tokens.access_token().await?;
        let url = self.endpoint_url(endpoint);

        info!("Making Reddit API request: GET {}", endpoint);
        let response = match self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(query_params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for GET {}: {}", endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        let api_error = match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after_secs(response.headers()).unwrap_or(60);
                warn!("Rate limited, retry after {} seconds", retry_after);
                RedditApiError::RateLimitExceeded { retry_after }
            }
            StatusCode::UNAUTHORIZED => {
                self.tokens.invalidate().await;
                RedditApiError::InvalidToken
            }
            StatusCode::FORBIDDEN => RedditApiError::Forbidden {
                resource: endpoint.to_string(),
            },
            StatusCode::NOT_FOUND => not_found,
            status if status.is_redirection() => not_found,
            status if status.is_server_error() => RedditApiError::ServerError {
                status_code: status.as_u16(),
            },
            status => RedditApiError::InvalidResponse {
                details: format!("Unexpected HTTP status {} for {}", status, endpoint),
            },
        };

        Err(CoreError::RedditApi(api_error))
    }
}

/// Reads and decodes a JSON body. Only a malformed body is a permanent
/// failure; a body that times out or breaks off mid-transfer is not.
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, CoreError> {
    response.json().await.map_err(|e| {
        if e.is_timeout() {
            warn!("Timed out reading {}: {}", what, e);
            CoreError::RedditApi(RedditApiError::RequestTimeout)
        } else if e.is_decode() {
            error!("Failed to parse {}: {}", what, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse {}", what),
            })
        } else {
            warn!("Connection failed while reading {}: {}", what, e);
            CoreError::Network(e)
        }
    })
}

impl RedditApi for HttpRedditApi {
    /// Resolution is local: listings are addressed by name, so no request is
    /// made and multireddits such as `rust+golang` pass through.
    async fn subreddit(&self, name: &str) -> Result<SubredditHandle, CoreError> {
        let name = normalize_subreddit_name(name)?;
        debug!("Resolved subreddit r/{}", name);
        Ok(SubredditHandle::new(name))
    }

    async fn top_posts(
        &self,
        subreddit: &SubredditHandle,
        limit: u32,
    ) -> Result<Vec<PostHandle>, CoreError> {
        let endpoint = format!("/r/{}/top", subreddit.name);
        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str()), ("t", "all"), ("raw_json", "1")];

        let response = self
            .make_request(
                &endpoint,
                &params,
                RedditApiError::SubredditNotFound {
                    subreddit: subreddit.name.clone(),
                },
            )
            .await?;

        let listing: PostListing =
            read_json(response, &format!("posts for r/{}", subreddit.name)).await?;

        let posts = posts_from_listing(listing, limit);
        info!("Retrieved {} top posts from r/{}", posts.len(), subreddit.name);
        Ok(posts)
    }

    async fn comments(&self, post: &PostHandle) -> Result<Vec<CommentHandle>, CoreError> {
        let endpoint = format!("/comments/{}", post.id);

        let response = self
            .make_request(
                &endpoint,
                &[("raw_json", "1")],
                RedditApiError::PostNotFound {
                    post_id: post.id.clone(),
                },
            )
            .await?;

        let (_post, listing): (IgnoredAny, CommentListing) =
            read_json(response, &format!("comments for post {}", post.id)).await?;

        let comments = comments_from_listing(listing);
        debug!("Retrieved {} comments for post {}", comments.len(), post.id);
        Ok(comments)
    }
}

/// Accepts `rust`, `r/rust` and `/r/rust`.
pub fn normalize_subreddit_name(name: &str) -> Result<&str, CoreError> {
    let trimmed = name.trim().trim_start_matches('/');
    let trimmed = trimmed
        .strip_prefix("r/")
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput {
            message: format!("Invalid subreddit name: '{}'", name),
        });
    }
    Ok(trimmed)
}

pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .map(|secs| secs.ceil() as u64)
}

fn posts_from_listing(listing: PostListing, limit: u32) -> Vec<PostHandle> {
    listing
        .data
        .children
        .into_iter()
        .take(limit as usize)
        .map(|child| child.data.into())
        .collect()
}

fn comments_from_listing(listing: CommentListing) -> Vec<CommentHandle> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|thing| match thing {
            RedditCommentThing::Comment(data) => Some(data.into()),
            RedditCommentThing::More(_) => None,
        })
        .collect()
}

impl From<RedditPostData> for PostHandle {
    fn from(post_data: RedditPostData) -> Self {
        PostHandle::new(post_data.id, post_data.title)
    }
}

impl From<RedditCommentData> for CommentHandle {
    fn from(comment_data: RedditCommentData) -> Self {
        CommentHandle::new(comment_data.body, comment_data.score)
    }
}
