use crate::query::{KeywordQuery, TopPostsQuery};
use crate::records::{CommentRecord, KeywordMention, PostRecord};
use crate::sentiment::{score_records, Scorable};
use reddit_client::{
    HttpRedditApi, PostComments, RedditApi, ResolveSubreddit, RetryExecutor, RetryPolicy,
    TopPosts,
};
use redditkit_core::{
    CommentHandle, CoreError, PostHandle, RedditCredentials, SubredditHandle, ToolkitConfig,
};
use sentiment_engine::{LexiconAnalyzer, PolarityScorer};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Collects posts and comments from Reddit on behalf of an agent.
///
/// Every API call goes through the retry executor. Calls run strictly one
/// after another, with the configured delay after each processed post.
#[derive(Debug)]
pub struct RedditToolkit<A, S = LexiconAnalyzer> {
    api: A,
    scorer: S,
    retry: RetryExecutor,
    delay: Duration,
}

impl RedditToolkit<HttpRedditApi, LexiconAnalyzer> {
    /// Builds a toolkit backed by the live Reddit API.
    ///
    /// Incomplete credentials are accepted here; they fail on the first request.
    pub fn from_config(
        credentials: RedditCredentials,
        config: &ToolkitConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let api = HttpRedditApi::new(credentials, config)?;
        Ok(Self::new(
            api,
            LexiconAnalyzer::default(),
            RetryPolicy::from_config(config),
        ))
    }

    /// Reads credentials from the environment and tuning from
    /// `REDDIT_TOOLKIT_CONFIG`, if set.
    pub fn from_env() -> Result<Self, CoreError> {
        let config = ToolkitConfig::load()?;
        Self::from_config(RedditCredentials::from_env(), &config)
    }
}

impl<A, S> RedditToolkit<A, S>
where
    A: RedditApi,
    S: PolarityScorer,
{
    /// The retry delay doubles as the courtesy pause between posts.
    pub fn new(api: A, scorer: S, policy: RetryPolicy) -> Self {
        let delay = policy.delay;
        Self {
            api,
            scorer,
            retry: RetryExecutor::new(policy),
            delay,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.retry.policy()
    }

    /// Collects the top posts of a subreddit with the first comments of each.
    pub async fn collect_top_posts(
        &self,
        query: &TopPostsQuery,
    ) -> Result<Vec<PostRecord>, CoreError> {
        query.validate()?;

        let (subreddit, posts) = self
            .fetch_top_posts(&query.subreddit_name, query.post_limit)
            .await?;

        let mut data = Vec::with_capacity(posts.len());
        for post in posts {
            let comments = self.fetch_comments(&post, query.comment_limit).await?;
            data.push(PostRecord {
                title: post.title,
                comments: comments.into_iter().map(CommentRecord::from).collect(),
            });
            self.pause().await;
        }

        info!("Collected {} top posts from r/{}", data.len(), subreddit.name);
        Ok(data)
    }

    /// Adds a polarity score to every flat comment record.
    pub fn perform_sentiment_analysis<T: Scorable>(
        &self,
        data: Vec<T>,
    ) -> Result<Vec<T>, CoreError> {
        let scored = score_records(&self.scorer, data)?;
        debug!("Scored sentiment of {} records", scored.len());
        Ok(scored)
    }

    /// Finds comments mentioning any of the keywords across several subreddits.
    ///
    /// Rows keep subreddit order, then post ranking, then comment order.
    pub async fn track_keyword_discussions(
        &self,
        query: &KeywordQuery,
    ) -> Result<Vec<KeywordMention>, CoreError> {
        query.validate()?;

        let keywords: Vec<String> = query.keywords.iter().map(|k| k.to_lowercase()).collect();
        let mut data = Vec::new();

        for subreddit_name in &query.subreddits {
            let (_, posts) = self
                .fetch_top_posts(subreddit_name, query.post_limit)
                .await?;

            for post in &posts {
                let comments = self.fetch_comments(post, query.comment_limit).await?;
                data.extend(
                    comments
                        .into_iter()
                        .filter(|comment| mentions_any(&comment.body, &keywords))
                        .map(|comment| KeywordMention {
                            subreddit: subreddit_name.clone(),
                            post_title: post.title.clone(),
                            comment_body: comment.body,
                            upvotes: comment.score,
                            sentiment_score: None,
                        }),
                );
                self.pause().await;
            }
        }

        info!(
            "Found {} keyword mentions across {} subreddits",
            data.len(),
            query.subreddits.len()
        );

        if query.sentiment_analysis {
            data = self.perform_sentiment_analysis(data)?;
        }
        Ok(data)
    }

    async fn fetch_top_posts(
        &self,
        subreddit_name: &str,
        limit: u32,
    ) -> Result<(SubredditHandle, Vec<PostHandle>), CoreError> {
        let subreddit = self
            .retry
            .execute(&self.api, &ResolveSubreddit { name: subreddit_name })
            .await?;

        let mut posts = self
            .retry
            .execute(
                &self.api,
                &TopPosts {
                    subreddit: &subreddit,
                    limit,
                },
            )
            .await?;
        posts.truncate(limit as usize);

        Ok((subreddit, posts))
    }

    async fn fetch_comments(
        &self,
        post: &PostHandle,
        limit: u32,
    ) -> Result<Vec<CommentHandle>, CoreError> {
        let mut comments = self
            .retry
            .execute(&self.api, &PostComments { post })
            .await?;
        comments.truncate(limit as usize);
        Ok(comments)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

fn mentions_any(body: &str, lowercase_keywords: &[String]) -> bool {
    let body = body.to_lowercase();
    lowercase_keywords
        .iter()
        .any(|keyword| body.contains(keyword.as_str()))
}
