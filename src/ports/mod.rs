//! Port traits implemented by adapters.

pub mod article_port;
pub mod config_port;
pub mod ledger_port;
pub mod report_port;
pub mod watchlist_port;
