#[cfg(test)]
mod tests {
    use crate::{
        KeywordMention, KeywordQuery, LexiconAnalyzer, RedditToolkit, ToolCall, TopPostsQuery,
        COLLECT_TOP_POSTS, PERFORM_SENTIMENT_ANALYSIS, TRACK_KEYWORD_DISCUSSIONS,
    };
    use reddit_client::{RedditApi, RetryPolicy};
    use redditkit_core::{
        CommentHandle, CoreError, PostHandle, RedditApiError, SubredditHandle,
    };
    use serde_json::{json, Map, Value};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    /// In-memory Reddit with optional transient failures on subreddit lookups.
    #[derive(Default)]
    struct FakeReddit {
        posts: HashMap<String, Vec<PostHandle>>,
        comments: HashMap<String, Vec<CommentHandle>>,
        transient_failures: Cell<u32>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeReddit {
        fn with_subreddit(mut self, name: &str, posts: Vec<(PostHandle, Vec<CommentHandle>)>) -> Self {
            let mut handles = Vec::new();
            for (post, comments) in posts {
                self.comments.insert(post.id.clone(), comments);
                handles.push(post);
            }
            self.posts.insert(name.to_string(), handles);
            self
        }

        fn failing_lookups(self, count: u32) -> Self {
            self.transient_failures.set(count);
            self
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn call_count(&self, prefix: &str) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|call| call.starts_with(prefix))
                .count()
        }
    }

    impl RedditApi for FakeReddit {
        async fn subreddit(&self, name: &str) -> Result<SubredditHandle, CoreError> {
            self.record(format!("subreddit:{name}"));

            let remaining = self.transient_failures.get();
            if remaining > 0 {
                self.transient_failures.set(remaining - 1);
                return Err(RedditApiError::RequestTimeout.into());
            }

            if self.posts.contains_key(name) {
                Ok(SubredditHandle::new(name))
            } else {
                Err(RedditApiError::SubredditNotFound {
                    subreddit: name.to_string(),
                }
                .into())
            }
        }

        async fn top_posts(
            &self,
            subreddit: &SubredditHandle,
            limit: u32,
        ) -> Result<Vec<PostHandle>, CoreError> {
            self.record(format!("top:{}:{limit}", subreddit.name));
            // Ignores the limit so truncation on the caller side is exercised.
            Ok(self.posts.get(&subreddit.name).cloned().unwrap_or_default())
        }

        async fn comments(&self, post: &PostHandle) -> Result<Vec<CommentHandle>, CoreError> {
            self.record(format!("comments:{}", post.id));
            Ok(self.comments.get(&post.id).cloned().unwrap_or_default())
        }
    }

    fn post(id: &str, title: &str, comments: &[(&str, i64)]) -> (PostHandle, Vec<CommentHandle>) {
        (
            PostHandle::new(id, title),
            comments
                .iter()
                .map(|(body, score)| CommentHandle::new(*body, *score))
                .collect(),
        )
    }

    fn toolkit(api: FakeReddit) -> RedditToolkit<FakeReddit> {
        RedditToolkit::new(api, LexiconAnalyzer::default(), RetryPolicy::default())
    }

    fn news_reddit() -> FakeReddit {
        FakeReddit::default()
            .with_subreddit(
                "news",
                vec![
                    post("p1", "First post", &[("C1 body", 5), ("C2 body", 3)]),
                    post("p2", "Second post", &[("Only comment", 1)]),
                    post("p3", "Third post", &[]),
                ],
            )
            .with_subreddit(
                "tech",
                vec![post(
                    "t1",
                    "Tech post",
                    &[("This is GREAT news", 7), ("nothing special", 2)],
                )],
            )
    }

    #[tokio::test]
    async fn test_collect_top_posts_keeps_first_comments() {
        let toolkit = toolkit(news_reddit());
        let query = TopPostsQuery::new("news").with_limits(2, 1);

        let posts = toolkit.collect_top_posts(&query).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "First post");
        assert_eq!(posts[0].comments.len(), 1);
        assert_eq!(posts[0].comments[0].body, "C1 body");
        assert_eq!(posts[0].comments[0].upvotes, 5);
        assert_eq!(posts[1].title, "Second post");

        let value = serde_json::to_value(&posts[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "Post Title": "First post",
                "Comments": [{ "Comment Body": "C1 body", "Upvotes": 5 }]
            })
        );
    }

    #[tokio::test]
    async fn test_collect_top_posts_with_fewer_posts_than_limit() {
        let toolkit = toolkit(news_reddit());
        let query = TopPostsQuery::new("news").with_limits(10, 10);

        let posts = toolkit.collect_top_posts(&query).await.unwrap();

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["First post", "Second post", "Third post"]);
        assert!(posts[2].comments.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limits_are_rejected_before_any_request() {
        let toolkit = toolkit(news_reddit());

        let result = toolkit
            .collect_top_posts(&TopPostsQuery::new("news").with_limits(0, 1))
            .await;
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));

        let result = toolkit
            .track_keyword_discussions(&KeywordQuery::new(["news"], ["post"]).with_limits(1, 0))
            .await;
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));

        assert!(toolkit.api().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_track_keywords_matches_case_insensitively() {
        let toolkit = toolkit(news_reddit());
        let query = KeywordQuery::new(["tech"], ["great"]);

        let mentions = toolkit.track_keyword_discussions(&query).await.unwrap();

        assert_eq!(
            mentions,
            vec![KeywordMention {
                subreddit: "tech".to_string(),
                post_title: "Tech post".to_string(),
                comment_body: "This is GREAT news".to_string(),
                upvotes: 7,
                sentiment_score: None,
            }]
        );

        let value = serde_json::to_value(&mentions[0]).unwrap();
        assert!(value.get("Sentiment Score").is_none());
    }

    #[tokio::test]
    async fn test_track_keywords_preserves_subreddit_order() {
        let toolkit = toolkit(news_reddit());
        let query = KeywordQuery::new(["tech", "news"], ["body", "news", "comment"]);

        let mentions = toolkit.track_keyword_discussions(&query).await.unwrap();

        let rows: Vec<_> = mentions
            .iter()
            .map(|m| (m.subreddit.as_str(), m.comment_body.as_str()))
            .collect();
        assert_eq!(
            rows,
            [
                ("tech", "This is GREAT news"),
                ("news", "C1 body"),
                ("news", "C2 body"),
                ("news", "Only comment"),
            ]
        );
    }

    #[tokio::test]
    async fn test_track_keywords_with_sentiment_analysis() {
        let toolkit = toolkit(news_reddit());
        let query = KeywordQuery::new(["tech"], ["great"]).with_sentiment_analysis(true);

        let mentions = toolkit.track_keyword_discussions(&query).await.unwrap();

        assert_eq!(mentions.len(), 1);
        let score = mentions[0].sentiment_score.unwrap();
        assert!(score > 0.0 && score <= 1.0);
    }

    #[tokio::test]
    async fn test_track_keywords_without_matches_is_empty() {
        let toolkit = toolkit(news_reddit());
        let query = KeywordQuery::new(["news"], ["zzz"]).with_sentiment_analysis(true);

        let mentions = toolkit.track_keyword_discussions(&query).await.unwrap();
        assert!(mentions.is_empty());
    }

    #[test]
    fn test_sentiment_analysis_of_json_records() {
        let toolkit = toolkit(FakeReddit::default());
        let records: Vec<Map<String, Value>> = vec![
            json!({ "Comment Body": "I love this", "Upvotes": 3 }),
            json!({ "Comment Body": "I hate this" }),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();

        let scored = toolkit.perform_sentiment_analysis(records).unwrap();

        assert_eq!(scored.len(), 2);
        assert!(scored[0]["Sentiment Score"].as_f64().unwrap() > 0.0);
        assert!(scored[1]["Sentiment Score"].as_f64().unwrap() < 0.0);
        assert_eq!(scored[0]["Upvotes"], json!(3));
    }

    #[test]
    fn test_sentiment_analysis_rejects_nested_post_records() {
        let toolkit = toolkit(FakeReddit::default());
        let nested = json!({
            "Post Title": "First post",
            "Comments": [{ "Comment Body": "I love this", "Upvotes": 1 }]
        });

        let result = toolkit.perform_sentiment_analysis(vec![nested.as_object().cloned().unwrap()]);

        assert!(matches!(
            result,
            Err(CoreError::MissingField { field }) if field == "Comment Body"
        ));
    }

    #[tokio::test]
    async fn test_transient_lookup_failure_is_retried() {
        let toolkit = toolkit(news_reddit().failing_lookups(2));
        let query = TopPostsQuery::new("tech").with_limits(1, 1);

        let posts = toolkit.collect_top_posts(&query).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(toolkit.api().call_count("subreddit:"), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_last_error() {
        let toolkit = toolkit(news_reddit().failing_lookups(5));
        let query = TopPostsQuery::new("tech");

        let result = toolkit.collect_top_posts(&query).await;

        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::RequestTimeout))
        ));
        assert_eq!(toolkit.api().call_count("subreddit:"), 3);
        assert_eq!(toolkit.api().call_count("top:"), 0);
    }

    #[tokio::test]
    async fn test_missing_subreddit_is_not_retried() {
        let toolkit = toolkit(news_reddit());
        let query = KeywordQuery::new(["tech", "missing"], ["great"]);

        let result = toolkit.track_keyword_discussions(&query).await;

        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::SubredditNotFound { subreddit }))
                if subreddit == "missing"
        ));
        assert_eq!(toolkit.api().call_count("subreddit:missing"), 1);
    }

    #[tokio::test]
    async fn test_delay_after_each_post() {
        let delay = Duration::from_millis(20);
        let toolkit = RedditToolkit::new(
            news_reddit(),
            LexiconAnalyzer::default(),
            RetryPolicy::new(3, delay),
        );
        let query = TopPostsQuery::new("news").with_limits(2, 1);

        let started = Instant::now();
        toolkit.collect_top_posts(&query).await.unwrap();

        assert!(started.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn test_keyword_tracking_delays_after_each_post() {
        let delay = Duration::from_millis(20);
        let toolkit = RedditToolkit::new(
            news_reddit(),
            LexiconAnalyzer::default(),
            RetryPolicy::new(3, delay),
        );
        // Three posts across two subreddits, none of them matching.
        let query = KeywordQuery::new(["news", "tech"], ["zzz"]).with_limits(2, 1);

        let started = Instant::now();
        let mentions = toolkit.track_keyword_discussions(&query).await.unwrap();

        assert!(mentions.is_empty());
        assert!(started.elapsed() >= delay * 3);
    }

    #[tokio::test]
    async fn test_invoke_collect_top_posts_with_defaults() {
        let toolkit = toolkit(news_reddit());
        let call = ToolCall::new(COLLECT_TOP_POSTS, json!({ "subreddit_name": "news" }));

        let result = toolkit.invoke(&call).await.unwrap();

        let posts = result.as_array().unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0]["Post Title"], json!("First post"));
        assert_eq!(posts[0]["Comments"].as_array().unwrap().len(), 2);
        assert_eq!(toolkit.api().call_count("top:news:5"), 1);
    }

    #[tokio::test]
    async fn test_invoke_track_keyword_discussions() {
        let toolkit = toolkit(news_reddit());
        let call = ToolCall::new(
            TRACK_KEYWORD_DISCUSSIONS,
            json!({ "subreddits": ["tech"], "keywords": ["GREAT"], "sentiment_analysis": true }),
        );

        let result = toolkit.invoke(&call).await.unwrap();

        assert_eq!(result[0]["Subreddit"], json!("tech"));
        assert!(result[0]["Sentiment Score"].is_number());
        assert_eq!(toolkit.api().call_count("top:tech:10"), 1);
    }

    #[tokio::test]
    async fn test_invoke_perform_sentiment_analysis() {
        let toolkit = toolkit(FakeReddit::default());
        let call = ToolCall::new(
            PERFORM_SENTIMENT_ANALYSIS,
            json!({ "data": [{ "Comment Body": "I love this" }] }),
        );

        let result = toolkit.invoke(&call).await.unwrap();

        assert!(result[0]["Sentiment Score"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_invoke_rejects_unknown_tool_and_bad_arguments() {
        let toolkit = toolkit(news_reddit());

        let result = toolkit.invoke(&ToolCall::new("delete_subreddit", Value::Null)).await;
        assert!(matches!(result, Err(CoreError::UnknownTool { name }) if name == "delete_subreddit"));

        let result = toolkit
            .invoke(&ToolCall::new(COLLECT_TOP_POSTS, Value::Null))
            .await;
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));

        let result = toolkit
            .invoke(&ToolCall::new(
                COLLECT_TOP_POSTS,
                json!({ "subreddit_name": "news", "post_limit": -1 }),
            ))
            .await;
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
    }

    #[test]
    fn test_get_tools_lists_all_operations() {
        let toolkit = toolkit(FakeReddit::default());

        let tools = toolkit.get_tools();

        let names: Vec<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [COLLECT_TOP_POSTS, PERFORM_SENTIMENT_ANALYSIS, TRACK_KEYWORD_DISCUSSIONS]
        );
        assert_eq!(tools[0].parameters["required"], json!(["subreddit_name"]));
        assert_eq!(
            tools[2].parameters["properties"]["post_limit"]["default"],
            json!(10)
        );
    }
}
