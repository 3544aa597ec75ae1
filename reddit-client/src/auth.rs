//! Application-only OAuth2 for the Reddit API.
//!
//! Reddit issues bearer tokens for "script" and "web" apps through the client
//! credentials grant. The token is requested lazily on the first API call and
//! reused until shortly before it expires, so missing or wrong credentials only
//! surface when a request is actually made.

use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError, Scope,
    TokenResponse, TokenUrl,
};
use redditkit_core::{CoreError, RedditApiError, RedditCredentials};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

const AUTHORIZE_URL: &str = "https://www.reddit.com/api/v1/authorize";
const READ_SCOPE: &str = "read";
// Reddit tokens live for an hour; refresh a minute early.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: Instant,
}

impl AccessToken {
    pub fn new(secret: String, lifetime: Duration) -> Self {
        Self {
            secret,
            expires_at: Instant::now() + lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN >= self.expires_at
    }
}

/// Transport failures while talking to the token endpoint.
#[derive(Debug, Error)]
pub enum TokenTransportError {
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned HTTP {status}")]
    Status {
        status: StatusCode,
        retry_after: Option<u64>,
    },
}

#[derive(Debug)]
pub struct TokenProvider {
    oauth_client: BasicClient,
    http_client: Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(
        credentials: &RedditCredentials,
        token_url: &Url,
        http_client: Client,
    ) -> Result<Self, CoreError> {
        let auth_url = AuthUrl::new(AUTHORIZE_URL.to_string()).map_err(|e| CoreError::Internal {
            message: format!("Invalid authorize URL: {}", e),
        })?;

        let oauth_client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            auth_url,
            Some(TokenUrl::from_url(token_url.clone())),
        );

        Ok(Self {
            oauth_client,
            http_client,
            cached: Mutex::new(None),
        })
    }

    /// Returns a valid bearer token, requesting a new one when none is cached
    /// or the cached one is about to expire.
    pub async fn access_token(&self) -> Result<String, CoreError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.secret.clone());
        }

        let token = self.request_token().await?;
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }

    /// Drops the cached token so the next call authenticates again.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            debug!("Discarded cached Reddit access token");
        }
    }

    async fn request_token(&self) -> Result<AccessToken, CoreError> {
        debug!("Requesting application-only Reddit access token");

        let response = self
            .oauth_client
            .exchange_client_credentials()
            .add_scope(Scope::new(READ_SCOPE.to_string()))
            .request_async(|request| send_token_request(&self.http_client, request))
            .await
            .map_err(token_error)?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        info!("Obtained Reddit access token valid for {:?}", lifetime);

        Ok(AccessToken::new(
            response.access_token().secret().clone(),
            lifetime,
        ))
    }
}

async fn send_token_request(
    http_client: &Client,
    request: HttpRequest,
) -> Result<HttpResponse, TokenTransportError> {
    let response = http_client
        .request(request.method, request.url)
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    if status_code == StatusCode::TOO_MANY_REQUESTS || status_code.is_server_error() {
        return Err(TokenTransportError::Status {
            status: status_code,
            retry_after: crate::api::retry_after_secs(response.headers()),
        });
    }

    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

fn token_error(error: RequestTokenError<TokenTransportError, BasicErrorResponse>) -> CoreError {
    match error {
        RequestTokenError::Request(TokenTransportError::Http(e)) if e.is_timeout() => {
            CoreError::RedditApi(RedditApiError::RequestTimeout)
        }
        RequestTokenError::Request(TokenTransportError::Http(e)) => CoreError::Network(e),
        RequestTokenError::Request(TokenTransportError::Status {
            status,
            retry_after,
        }) => {
            warn!("Token endpoint returned HTTP {}", status);
            if status == StatusCode::TOO_MANY_REQUESTS {
                CoreError::RedditApi(RedditApiError::RateLimitExceeded {
                    retry_after: retry_after.unwrap_or(60),
                })
            } else {
                CoreError::RedditApi(RedditApiError::ServerError {
                    status_code: status.as_u16(),
                })
            }
        }
        RequestTokenError::ServerResponse(response) => {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: response.to_string(),
            })
        }
        // Reddit answers bad credentials with a non-OAuth JSON body.
        RequestTokenError::Parse(e, _) => {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: format!("Unexpected token response: {}", e),
            })
        }
        RequestTokenError::Other(reason) => {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_not_expired() {
        let token = AccessToken::new("abc".to_string(), Duration::from_secs(3600));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_inside_margin_counts_as_expired() {
        let token = AccessToken::new("abc".to_string(), Duration::from_secs(30));
        assert!(token.is_expired());
    }

    #[test]
    fn test_rejected_credentials_are_not_retryable() {
        use redditkit_core::ErrorExt;

        let error = token_error(RequestTokenError::Other("invalid_grant".to_string()));
        assert!(matches!(
            error,
            CoreError::RedditApi(RedditApiError::AuthenticationFailed { ref reason })
                if reason == "invalid_grant"
        ));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_throttled_token_endpoint_is_retryable() {
        use redditkit_core::ErrorExt;

        let error = token_error(RequestTokenError::Request(TokenTransportError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            retry_after: Some(7),
        }));
        assert!(matches!(
            error,
            CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 7 })
        ));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_invalidate_without_token_is_noop() {
        let credentials =
            RedditCredentials::new("id".to_string(), "secret".to_string(), "ua".to_string());
        let token_url = Url::parse(redditkit_core::DEFAULT_TOKEN_URL).unwrap();
        let provider = TokenProvider::new(&credentials, &token_url, Client::new()).unwrap();

        provider.invalidate().await;
        assert!(provider.cached.lock().await.is_none());
    }
}
