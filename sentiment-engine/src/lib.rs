//! Polarity scoring for short social-media texts.
//!
//! Scores range from -1.0 (most negative) to 1.0 (most positive); text without
//! any sentiment-bearing words scores 0.0.

mod analyzer;
mod lexicon;

pub use analyzer::LexiconAnalyzer;
pub use lexicon::SentimentLexicon;

pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> f64;
}

impl<T: PolarityScorer + ?Sized> PolarityScorer for &T {
    fn polarity(&self, text: &str) -> f64 {
        (**self).polarity(text)
    }
}
