use std::collections::HashMap;

const POSITIVE: &[(&str, f64)] = &[
    ("agree", 0.2),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("clean", 0.37),
    ("cool", 0.35),
    ("easy", 0.43),
    ("elegant", 0.5),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("excellent", 1.0),
    ("exciting", 0.3),
    ("fantastic", 0.8),
    ("favorite", 0.5),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("incredible", 0.9),
    ("interesting", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("pleased", 0.5),
    ("positive", 0.23),
    ("recommend", 0.3),
    ("reliable", 0.5),
    ("safe", 0.5),
    ("solid", 0.3),
    ("superb", 1.0),
    ("thanks", 0.2),
    ("useful", 0.3),
    ("win", 0.8),
    ("wonderful", 1.0),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("angry", -0.5),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -0.6),
    ("broken", -0.4),
    ("buggy", -0.5),
    ("confusing", -0.4),
    ("crash", -0.4),
    ("dangerous", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disgusting", -1.0),
    ("expensive", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.3),
    ("frustrating", -0.7),
    ("garbage", -0.7),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("lame", -0.5),
    ("mess", -0.4),
    ("negative", -0.3),
    ("painful", -0.7),
    ("pathetic", -1.0),
    ("poor", -0.4),
    ("problem", -0.2),
    ("ridiculous", -0.33),
    ("sad", -0.5),
    ("scam", -0.8),
    ("slow", -0.3),
    ("stupid", -0.8),
    ("sucks", -0.3),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("unfortunately", -0.5),
    ("useless", -0.5),
    ("worried", -0.4),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.3),
    ("barely", 0.4),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("kinda", 0.7),
    ("quite", 1.1),
    ("really", 1.2),
    ("slightly", 0.5),
    ("so", 1.2),
    ("somewhat", 0.7),
    ("super", 1.3),
    ("totally", 1.2),
    ("very", 1.3),
];

const NEGATIONS: &[&str] = &[
    "cannot", "cant", "dont", "isnt", "neither", "never", "no", "nobody", "none", "nor", "not",
    "nothing", "wasnt", "without", "wont",
];

/// Word-level polarity values plus the modifiers that adjust them.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    polarities: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        let polarities = POSITIVE
            .iter()
            .chain(NEGATIVE)
            .map(|(word, value)| (word.to_string(), *value))
            .collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(word, factor)| (word.to_string(), *factor))
            .collect();

        Self {
            polarities,
            intensifiers,
        }
    }
}

impl SentimentLexicon {
    /// Adds or overrides entries. Values are clamped to [-1.0, 1.0].
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, value) in entries {
            self.polarities
                .insert(word.into().to_lowercase(), value.clamp(-1.0, 1.0));
        }
        self
    }

    pub fn polarity(&self, word: &str) -> Option<f64> {
        self.polarities.get(word).copied()
    }

    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        word.ends_with("n't") || NEGATIONS.contains(&word)
    }

    pub fn len(&self) -> usize {
        self.polarities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_has_both_polarities() {
        let lexicon = SentimentLexicon::default();
        assert!(lexicon.polarity("love").unwrap() > 0.0);
        assert!(lexicon.polarity("hate").unwrap() < 0.0);
        assert_eq!(lexicon.polarity("table"), None);
        assert_eq!(lexicon.len(), POSITIVE.len() + NEGATIVE.len());
    }

    #[test]
    fn test_custom_entries_are_lowercased_and_clamped() {
        let lexicon = SentimentLexicon::default().with_entries([("Bullish", 3.0), ("rekt", -0.9)]);
        assert_eq!(lexicon.polarity("bullish"), Some(1.0));
        assert_eq!(lexicon.polarity("rekt"), Some(-0.9));
    }

    #[test]
    fn test_negations() {
        let lexicon = SentimentLexicon::default();
        assert!(lexicon.is_negation("not"));
        assert!(lexicon.is_negation("doesn't"));
        assert!(lexicon.is_negation("never"));
        assert!(!lexicon.is_negation("nothingness"));
    }
}
