//! Tracked positions picked from analyzed articles.
//!
//! The watchlist is plain state owned by the caller; loading and saving go
//! through a storage adapter.

use std::fmt;
use std::str::FromStr;

use super::article::{AnalyzedArticle, Sentiment};
use super::error::{LedgerError, ParseLabelError};
use super::trade::{Action, parse_label};

/// Intended stance on a tracked item. Unlike the ledger, `Hold` is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    Buy,
    Sell,
    Hold,
}

impl Stance {
    pub const ALL: [Stance; 3] = [Stance::Buy, Stance::Sell, Stance::Hold];

    pub fn label(self) -> &'static str {
        match self {
            Stance::Buy => "Buy",
            Stance::Sell => "Sell",
            Stance::Hold => "Hold",
        }
    }

    /// Exact canonical label, as written to storage.
    pub fn from_label(s: &str) -> Result<Self, ParseLabelError> {
        parse_label(&Stance::ALL, Stance::label, "stance", "Buy, Sell, Hold", s, true)
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stance {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Stance::ALL, Stance::label, "stance", "Buy, Sell, Hold", s, false)
    }
}

impl From<Action> for Stance {
    fn from(action: Action) -> Self {
        match action {
            Action::Buy => Stance::Buy,
            Action::Sell => Stance::Sell,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPosition {
    pub title: String,
    pub stance: Stance,
    pub investment_size: f64,
    pub sentiment: Sentiment,
    pub recommendation: Action,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    positions: Vec<TrackedPosition>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[TrackedPosition] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.positions.iter().map(|p| p.title.as_str()).collect()
    }

    /// Start tracking an analyzed article. The investment size must be a
    /// finite, non-negative amount.
    pub fn track(
        &mut self,
        article: &AnalyzedArticle,
        stance: Stance,
        investment_size: f64,
    ) -> Result<&TrackedPosition, LedgerError> {
        if !investment_size.is_finite() || investment_size < 0.0 {
            return Err(LedgerError::InvalidInput {
                field: "investment_size",
                reason: format!("{investment_size} is not a non-negative amount"),
            });
        }

        self.positions.push(TrackedPosition {
            title: article.article.title.clone(),
            stance,
            investment_size,
            sentiment: article.sentiment,
            recommendation: article.recommendation,
        });
        Ok(&self.positions[self.positions.len() - 1])
    }

    /// Drop every tracked entry with this title; returns how many went.
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let before = self.positions.len();
        self.positions.retain(|p| p.title != title);
        before - self.positions.len()
    }
}

impl From<Vec<TrackedPosition>> for Watchlist {
    fn from(positions: Vec<TrackedPosition>) -> Self {
        Self { positions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::Article;

    fn analyzed(title: &str, polarity: f64) -> AnalyzedArticle {
        AnalyzedArticle::analyze(Article {
            title: title.into(),
            description: "desc".into(),
            url: "https://example.com".into(),
            price: 100.0,
            polarity,
        })
    }

    #[test]
    fn track_copies_article_labels() {
        let mut list = Watchlist::new();
        let pos = list
            .track(&analyzed("Tesla faces challenges", -0.3), Stance::Hold, 250.0)
            .unwrap();
        assert_eq!(pos.title, "Tesla faces challenges");
        assert_eq!(pos.stance, Stance::Hold);
        assert_eq!(pos.sentiment, Sentiment::Negative);
        assert_eq!(pos.recommendation, Action::Sell);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn track_rejects_negative_size() {
        let mut list = Watchlist::new();
        let err = list
            .track(&analyzed("A", 0.1), Stance::Buy, -5.0)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput { field: "investment_size", .. }));
        assert!(list.is_empty());
    }

    #[test]
    fn track_rejects_nan_size() {
        let mut list = Watchlist::new();
        assert!(list.track(&analyzed("A", 0.1), Stance::Buy, f64::NAN).is_err());
    }

    #[test]
    fn remove_by_title_drops_all_duplicates() {
        let mut list = Watchlist::new();
        list.track(&analyzed("A", 0.1), Stance::Buy, 1.0).unwrap();
        list.track(&analyzed("B", 0.1), Stance::Buy, 1.0).unwrap();
        list.track(&analyzed("A", 0.1), Stance::Sell, 2.0).unwrap();

        assert_eq!(list.remove_by_title("A"), 2);
        assert_eq!(list.titles(), vec!["B"]);
        assert_eq!(list.remove_by_title("missing"), 0);
    }

    #[test]
    fn stance_parses_hold() {
        assert_eq!("hold".parse::<Stance>().unwrap(), Stance::Hold);
        assert_eq!(Stance::from(Action::Sell), Stance::Sell);
    }

    #[test]
    fn stored_stance_label_must_be_exact() {
        assert_eq!(Stance::from_label("Hold").unwrap(), Stance::Hold);
        assert!(Stance::from_label("hold").is_err());
        assert!(Stance::from_label(" Buy").is_err());
    }
}
