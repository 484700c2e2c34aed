//! Concrete adapter implementations for ports.

mod csv_file;
pub mod csv_ledger_adapter;
pub mod csv_watchlist_adapter;
pub mod file_config_adapter;
pub mod html_report;
pub mod sample_article_source;
pub mod serialized_ledger;
#[cfg(feature = "sqlite")]
pub mod sqlite_ledger_adapter;
