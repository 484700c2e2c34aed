//! News articles and the labels attached to them.

use std::fmt;

use super::error::ParseLabelError;
use super::trade::{Action, parse_label};

pub const MIN_ARTICLES: usize = 1;
pub const MAX_ARTICLES: usize = 10;
pub const DEFAULT_ARTICLES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub price: f64,
    /// Sentiment polarity in [-1, 1] as produced by the upstream scorer.
    pub polarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Sentiment::Positive
        } else if polarity < 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// Exact canonical label, as written to storage.
    pub fn from_label(s: &str) -> Result<Self, ParseLabelError> {
        parse_label(
            &Sentiment::ALL,
            Sentiment::label,
            "sentiment",
            "Positive, Neutral, Negative",
            s,
            true,
        )
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buy on positive polarity, otherwise sell.
pub fn recommend(polarity: f64) -> Action {
    if polarity > 0.0 {
        Action::Buy
    } else {
        Action::Sell
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedArticle {
    pub article: Article,
    pub sentiment: Sentiment,
    pub recommendation: Action,
}

impl AnalyzedArticle {
    pub fn analyze(article: Article) -> Self {
        let sentiment = Sentiment::from_polarity(article.polarity);
        let recommendation = recommend(article.polarity);
        Self {
            article,
            sentiment,
            recommendation,
        }
    }
}

/// Clamp a requested article count to the supported range.
pub fn clamp_count(requested: usize) -> usize {
    requested.clamp(MIN_ARTICLES, MAX_ARTICLES)
}
