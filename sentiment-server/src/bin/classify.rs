//! classify - score text from the command line
//!
//! Classifies each argument, or each line of stdin when no arguments are
//! given. Nothing is logged to the activity store.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_common::{Classifier, SentimentVerdict};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "classify")]
#[command(about = "Classify text as Positive, Negative or Neutral")]
#[command(version)]
struct Args {
    /// Print one JSON object per input instead of a table row
    #[arg(long)]
    json: bool,

    /// Text to classify; reads stdin lines when omitted
    text: Vec<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let classifier = Classifier::default();
    debug!("Using scorer {}", classifier.scorer_name());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.text.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            emit(&mut out, &classifier, &line, args.json)?;
        }
    } else {
        for text in &args.text {
            emit(&mut out, &classifier, text, args.json)?;
        }
    }

    Ok(())
}

fn emit(out: &mut impl Write, classifier: &Classifier, text: &str, json: bool) -> Result<()> {
    let verdict = classifier.classify(text)?;
    writeln!(out, "{}", render(&verdict, text, json)?)?;
    Ok(())
}

fn render(verdict: &SentimentVerdict, text: &str, json: bool) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "text": text,
            "sentiment": verdict.label,
            "polarity": verdict.polarity,
            "emoji": verdict.emoji,
        });
        return Ok(serde_json::to_string(&value)?);
    }

    Ok(format!(
        "{} {:<8} {:>7.3}  {}",
        verdict.emoji,
        verdict.label.as_str(),
        verdict.polarity,
        text
    ))
}
