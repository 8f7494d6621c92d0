//! Bundled lexicon polarity scorer
//!
//! Pattern-style scoring: every word found in the lexicon contributes its
//! polarity, scaled by any intensifiers that precede it ("very good") and
//! flipped and halved by a preceding negation ("not good"). The text's
//! polarity is the mean of the contributing words, or 0.0 when none match.
//!
//! Modifiers only carry forward within a clause; punctuation such as `.`,
//! `,` or `!` resets them.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::PolarityScorer;
use crate::Result;

/// Multiplier applied to a sentiment word preceded by a negation
const NEGATION_FACTOR: f64 = -0.5;

/// Characters that end a clause
const CLAUSE_BREAKS: &[char] = &['.', ',', ';', ':', '!', '?', '\n'];

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // Positive
        ("love", 0.5),
        ("loved", 0.7),
        ("loving", 0.6),
        ("lovely", 0.5),
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("wonderful", 1.0),
        ("fantastic", 0.4),
        ("excellent", 1.0),
        ("great", 0.8),
        ("good", 0.7),
        ("nice", 0.6),
        ("best", 1.0),
        ("better", 0.5),
        ("beautiful", 0.85),
        ("happy", 0.8),
        ("glad", 0.5),
        ("pleased", 0.5),
        ("pleasant", 0.73),
        ("excited", 0.375),
        ("exciting", 0.3),
        ("enjoy", 0.4),
        ("enjoyed", 0.4),
        ("perfect", 1.0),
        ("brilliant", 0.9),
        ("superb", 1.0),
        ("outstanding", 0.5),
        ("impressive", 1.0),
        ("incredible", 0.9),
        ("remarkable", 0.75),
        ("helpful", 0.5),
        ("friendly", 0.375),
        ("fun", 0.3),
        ("cool", 0.35),
        ("fine", 0.42),
        ("decent", 0.17),
        ("okay", 0.05),
        ("ok", 0.05),
        ("alright", 0.05),
        ("special", 0.36),
        ("interesting", 0.5),
        ("favorite", 0.5),
        ("thrilled", 0.7),
        ("successful", 0.75),
        ("worth", 0.3),
        ("smooth", 0.4),
        ("easy", 0.43),
        ("comfortable", 0.4),
        ("reliable", 0.5),
        ("recommend", 0.3),
        ("satisfied", 0.5),
        ("joy", 0.8),
        ("cheerful", 0.7),
        ("thanks", 0.2),
        // Negative
        ("terrible", -1.0),
        ("awful", -1.0),
        ("horrible", -1.0),
        ("dreadful", -1.0),
        ("disgusting", -1.0),
        ("pathetic", -1.0),
        ("nasty", -1.0),
        ("boring", -1.0),
        ("worst", -1.0),
        ("bad", -0.7),
        ("worse", -0.4),
        ("poor", -0.4),
        ("hate", -0.8),
        ("hated", -0.9),
        ("disappointing", -0.6),
        ("disappointed", -0.75),
        ("sad", -0.5),
        ("unhappy", -0.6),
        ("angry", -0.5),
        ("upset", -0.4),
        ("annoying", -0.8),
        ("annoyed", -0.4),
        ("frustrating", -0.4),
        ("frustrated", -0.7),
        ("ugly", -0.7),
        ("useless", -0.5),
        ("broken", -0.4),
        ("waste", -0.2),
        ("wasted", -0.2),
        ("slow", -0.3),
        ("difficult", -0.5),
        ("wrong", -0.5),
        ("stupid", -0.8),
        ("mediocre", -0.3),
        ("failed", -0.5),
        ("rude", -0.6),
        ("dirty", -0.6),
        ("expensive", -0.5),
        ("painful", -0.7),
        ("lame", -0.5),
        ("weak", -0.375),
        ("mess", -0.3),
        ("sorry", -0.5),
        ("long", -0.05),
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.3),
        ("too", 1.2),
        ("truly", 1.3),
        ("highly", 1.3),
        ("super", 1.3),
        ("totally", 1.3),
        ("completely", 1.3),
        ("absolutely", 1.4),
        ("extremely", 1.5),
        ("incredibly", 1.5),
        ("quite", 1.1),
        ("fairly", 0.9),
        ("rather", 0.9),
        ("somewhat", 0.7),
        ("kinda", 0.7),
        ("slightly", 0.5),
        ("barely", 0.4),
    ]
    .into_iter()
    .collect()
});

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "none", "nobody", "nowhere", "neither", "nor", "without",
    "cannot", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "cant", "wont",
];

/// Lexicon-based polarity scorer; deterministic and infallible
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    /// Number of sentiment-bearing words known to the scorer
    pub fn vocabulary_size(&self) -> usize {
        LEXICON.len()
    }

    fn score_clause(clause: &str, scores: &mut Vec<f64>) {
        let mut negated = false;
        let mut intensity = 1.0;

        for token in clause.split_whitespace().filter_map(normalize_token) {
            let token = token.as_str();

            if is_negator(token) {
                negated = true;
            } else if let Some(factor) = INTENSIFIERS.get(token) {
                intensity *= factor;
            } else if let Some(polarity) = LEXICON.get(token) {
                let mut score = polarity * intensity;
                if negated {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score.clamp(-1.0, 1.0));

                negated = false;
                intensity = 1.0;
            }
        }
    }
}

impl PolarityScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn polarity(&self, text: &str) -> Result<f64> {
        let mut scores = Vec::new();
        for clause in text.split(CLAUSE_BREAKS) {
            Self::score_clause(clause, &mut scores);
        }

        if scores.is_empty() {
            return Ok(0.0);
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(mean.clamp(-1.0, 1.0))
    }
}

/// Lowercase a token and strip surrounding punctuation, keeping inner
/// apostrophes ("isn't"). Returns `None` for pure punctuation.
fn normalize_token(raw: &str) -> Option<String> {
    let token = raw
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '’')
        .replace('’', "'")
        .to_lowercase();
    let token = token.trim_matches('\'');

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}
