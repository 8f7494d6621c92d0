//! Sentiment classification
//!
//! Maps free text to a [`SentimentVerdict`]: a polarity score from a
//! [`PolarityScorer`], bucketed into Positive / Negative / Neutral by fixed
//! thresholds, with a display glyph per bucket.
//!
//! Classification has no side effects. Persisting a verdict is the caller's
//! job (see [`crate::db::activity`]).

mod lexicon;

pub use lexicon::LexiconScorer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{Error, Result};

/// Polarity above this value is Positive (strict)
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Polarity below this value is Negative (strict)
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Decimal places kept in a verdict's polarity
pub const POLARITY_DECIMALS: i32 = 3;

/// Discrete sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// All labels, in display order
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Bucket a polarity score
    ///
    /// Both boundaries (±0.1) are Neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Display glyph for this label
    pub fn emoji(self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Negative => "😠",
            Sentiment::Neutral => "😐",
        }
    }

    /// Stored/serialized name
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    /// Case-insensitive parse of a label name
    fn from_str(s: &str) -> Result<Self> {
        Sentiment::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown sentiment: {}", s)))
    }
}

/// Outcome of classifying one piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentVerdict {
    #[serde(rename = "sentiment")]
    pub label: Sentiment,
    /// Rounded to three decimal places
    pub polarity: f64,
    pub emoji: &'static str,
}

impl SentimentVerdict {
    /// Verdict returned for empty or whitespace-only input
    pub fn neutral() -> Self {
        Self {
            label: Sentiment::Neutral,
            polarity: 0.0,
            emoji: Sentiment::Neutral.emoji(),
        }
    }

    /// Build a verdict from a raw polarity score
    ///
    /// The label is decided on the raw score; only the reported polarity is
    /// rounded.
    pub fn from_polarity(polarity: f64) -> Self {
        let label = Sentiment::from_polarity(polarity);
        Self {
            label,
            polarity: round_polarity(polarity),
            emoji: label.emoji(),
        }
    }
}

/// Round to [`POLARITY_DECIMALS`] places
pub fn round_polarity(polarity: f64) -> f64 {
    let scale = 10f64.powi(POLARITY_DECIMALS);
    let rounded = (polarity * scale).round() / scale;
    // Avoid reporting -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Source of a continuous polarity estimate in [-1.0, 1.0]
///
/// Implementations that depend on something remote report
/// [`Error::ScoringUnavailable`] when it cannot be reached.
pub trait PolarityScorer: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Score non-empty text
    fn polarity(&self, text: &str) -> Result<f64>;
}

/// Stateless text classifier over a pluggable scorer
#[derive(Clone)]
pub struct Classifier {
    scorer: Arc<dyn PolarityScorer>,
}

impl Classifier {
    pub fn new(scorer: Arc<dyn PolarityScorer>) -> Self {
        Self { scorer }
    }

    /// Name of the underlying scorer
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Classify `text`
    ///
    /// Empty or whitespace-only input short-circuits to
    /// [`SentimentVerdict::neutral`] without touching the scorer.
    /// Scorer output outside [-1, 1] is clamped; a non-finite score is
    /// reported as [`Error::ScoringUnavailable`].
    pub fn classify(&self, text: &str) -> Result<SentimentVerdict> {
        if text.trim().is_empty() {
            return Ok(SentimentVerdict::neutral());
        }

        let polarity = self.scorer.polarity(text)?;
        if !polarity.is_finite() {
            return Err(Error::ScoringUnavailable(format!(
                "{} returned a non-finite polarity",
                self.scorer.name()
            )));
        }

        Ok(SentimentVerdict::from_polarity(polarity.clamp(-1.0, 1.0)))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(LexiconScorer::new()))
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("scorer", &self.scorer.name())
            .finish()
    }
}
