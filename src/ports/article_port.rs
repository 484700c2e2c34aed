//! Article source port trait.

use crate::domain::article::Article;
use crate::domain::error::LedgerError;

pub trait ArticleSource {
    /// Fetch up to `limit` articles, newest first.
    fn fetch(&self, limit: usize) -> Result<Vec<Article>, LedgerError>;
}
