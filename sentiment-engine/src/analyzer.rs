use crate::lexicon::SentimentLexicon;
use crate::PolarityScorer;
use tracing::trace;

// Tokens inspected before a sentiment word when looking for a negation.
const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

/// Averages lexicon polarities over the words of a text, adjusting each hit
/// for a directly preceding intensifier and for nearby negations.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnalyzer {
    lexicon: SentimentLexicon,
}

impl LexiconAnalyzer {
    pub fn new(lexicon: SentimentLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &SentimentLexicon {
        &self.lexicon
    }

    fn score_token(&self, tokens: &[String], index: usize, base: f64) -> f64 {
        let mut score = base;

        if let Some(factor) = index
            .checked_sub(1)
            .and_then(|prev| self.lexicon.intensity(&tokens[prev]))
        {
            score *= factor;
        }

        let window_start = index.saturating_sub(NEGATION_WINDOW);
        if tokens[window_start..index]
            .iter()
            .any(|token| self.lexicon.is_negation(token))
        {
            score *= NEGATION_FACTOR;
        }

        score.clamp(-1.0, 1.0)
    }
}

impl PolarityScorer for LexiconAnalyzer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);

        let hits: Vec<f64> = tokens
            .iter()
            .enumerate()
            .filter_map(|(index, token)| {
                self.lexicon
                    .polarity(token)
                    .map(|base| self.score_token(&tokens, index, base))
            })
            .collect();

        if hits.is_empty() {
            return 0.0;
        }

        let polarity = (hits.iter().sum::<f64>() / hits.len() as f64).clamp(-1.0, 1.0);
        trace!("Scored {} sentiment words, polarity {:.3}", hits.len(), polarity);
        polarity
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
