//! Core domain types and logic.

pub mod analytics;
pub mod article;
pub mod config_validation;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod trade;
pub mod watchlist;
