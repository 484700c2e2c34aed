//! Canned article source used in place of a live news scraper.

use crate::domain::article::Article;
use crate::domain::error::LedgerError;
use crate::ports::article_port::ArticleSource;

pub struct SampleArticleSource {
    articles: Vec<Article>,
}

impl SampleArticleSource {
    pub fn new() -> Self {
        Self {
            articles: vec![
                Article {
                    title: "Apple stock on the rise".into(),
                    description: "Apple's stock has surged after great earnings report.".into(),
                    url: "https://www.economist.com/apple-stock".into(),
                    price: 150.0,
                    polarity: 0.8,
                },
                Article {
                    title: "Tesla faces challenges".into(),
                    description: "Tesla shares are struggling due to market concerns.".into(),
                    url: "https://www.economist.com/tesla-stock".into(),
                    price: 800.0,
                    polarity: -0.4,
                },
            ],
        }
    }
}

impl Default for SampleArticleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleSource for SampleArticleSource {
    fn fetch(&self, limit: usize) -> Result<Vec<Article>, LedgerError> {
        Ok(self.articles.iter().take(limit).cloned().collect())
    }
}
