//! # Sentiment Common Library
//!
//! Shared code for the sentiment analyzer service and its tools:
//! - Sentiment classification (verdicts, polarity scoring, bundled lexicon)
//! - Activity log storage and user identities (SQLite via sqlx)
//! - Form validation with structured field errors
//! - API request signing and shared request/response types
//! - Configuration loading and root folder resolution

pub mod api;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod validation;

pub use classifier::{Classifier, PolarityScorer, Sentiment, SentimentVerdict};
pub use error::{Error, Result};
