//! Sentiment scoring of flat comment records.
//!
//! Only flat rows carrying a top-level comment body can be scored. Nested post
//! records (title plus a list of comments) have no such field and are rejected
//! with [`CoreError::MissingField`]; flatten them first.

use crate::records::KeywordMention;
use redditkit_core::CoreError;
use sentiment_engine::PolarityScorer;
use serde_json::{Map, Value};

pub const COMMENT_BODY_FIELD: &str = "Comment Body";
pub const SENTIMENT_SCORE_FIELD: &str = "Sentiment Score";

/// A record that exposes a comment body and can store a polarity score.
pub trait Scorable {
    fn comment_body(&self) -> Result<&str, CoreError>;
    fn set_sentiment_score(&mut self, score: f64);
}

impl Scorable for KeywordMention {
    fn comment_body(&self) -> Result<&str, CoreError> {
        Ok(&self.comment_body)
    }

    fn set_sentiment_score(&mut self, score: f64) {
        self.sentiment_score = Some(score);
    }
}

impl Scorable for Map<String, Value> {
    fn comment_body(&self) -> Result<&str, CoreError> {
        match self.get(COMMENT_BODY_FIELD) {
            Some(Value::String(body)) => Ok(body),
            Some(other) => Err(CoreError::InvalidInput {
                message: format!("'{}' must be a string, got {}", COMMENT_BODY_FIELD, other),
            }),
            None => Err(CoreError::MissingField {
                field: COMMENT_BODY_FIELD.to_string(),
            }),
        }
    }

    fn set_sentiment_score(&mut self, score: f64) {
        self.insert(SENTIMENT_SCORE_FIELD.to_string(), Value::from(score));
    }
}

/// Scores every record in place and hands the same sequence back.
pub fn score_records<T, S>(scorer: &S, mut records: Vec<T>) -> Result<Vec<T>, CoreError>
where
    T: Scorable,
    S: PolarityScorer + ?Sized,
{
    for record in records.iter_mut() {
        let score = scorer.polarity(record.comment_body()?);
        record.set_sentiment_score(score);
    }
    Ok(records)
}
