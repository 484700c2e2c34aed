//! Watchlist storage port trait.

use crate::domain::error::LedgerError;
use crate::domain::watchlist::Watchlist;

pub trait WatchlistPort {
    fn load(&self) -> Result<Watchlist, LedgerError>;
    fn save(&self, watchlist: &Watchlist) -> Result<(), LedgerError>;
}
