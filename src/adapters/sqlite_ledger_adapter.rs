//! SQLite ledger adapter.
//!
//! One table row per trade, keyed by an autoincrement id. The ordinal index
//! used by callers is the row's position in id order, so a status change is
//! a single-row update inside a transaction rather than a full rewrite.

use crate::domain::error::LedgerError;
use crate::domain::lifecycle;
use crate::domain::trade::{Status, TradeOutcome, TradeRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

type StoredRow = (i64, String, String, String, String, String, String);

pub struct SqliteLedgerAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> LedgerError {
    LedgerError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> LedgerError {
    LedgerError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl SqliteLedgerAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, LedgerError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| LedgerError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let raw_pool_size = config.get_int("sqlite", "pool_size", 4);
        let pool_size = u32::try_from(raw_pool_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| LedgerError::ConfigInvalid {
                section: "sqlite".into(),
                key: "pool_size".into(),
                reason: format!("must be between 1 and {}, got {raw_pool_size}", u32::MAX),
            })?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, LedgerError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(pool_err)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, LedgerError> {
        self.pool.get().map_err(pool_err)
    }

    pub fn initialize_schema(&self) -> Result<(), LedgerError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS trades (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp TEXT NOT NULL,
                    title TEXT NOT NULL,
                    action TEXT NOT NULL,
                    summary TEXT NOT NULL,
                    status TEXT NOT NULL,
                    result TEXT NOT NULL DEFAULT ''
                );",
            )
            .map_err(query_err)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn to_record(ordinal: usize, stored: &StoredRow) -> Result<TradeRecord, LedgerError> {
    let (_, timestamp, title, action, summary, status, result) = stored;
    TradeRecord::from_fields(ordinal, timestamp, title, action, summary, status, result)
}

impl LedgerPort for SqliteLedgerAdapter {
    fn load(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, timestamp, title, action, summary, status, result
                 FROM trades ORDER BY id ASC",
            )
            .map_err(query_err)?;

        let rows = stmt.query_map([], read_row).map_err(query_err)?;

        let mut records = Vec::new();
        for (ordinal, row) in rows.enumerate() {
            let stored = row.map_err(query_err)?;
            records.push(to_record(ordinal, &stored)?);
        }

        tracing::debug!(records = records.len(), "loaded ledger from sqlite");
        Ok(records)
    }

    fn append(&self, record: TradeRecord) -> Result<usize, LedgerError> {
        if let Err(e) = record.validate() {
            tracing::warn!(error = %e, "append rejected");
            return Err(e);
        }

        let [timestamp, title, action, summary, status, result] = record.to_row();
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        tx.execute(
            "INSERT INTO trades (timestamp, title, action, summary, status, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![timestamp, title, action, summary, status, result],
        )
        .map_err(query_err)?;
        let position: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM trades WHERE id <= last_insert_rowid()",
                [],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        tx.commit().map_err(query_err)?;

        let index = position.max(1) as usize - 1;
        tracing::info!(index, title = %title, "appended trade to sqlite");
        Ok(index)
    }

    fn update_status(
        &self,
        index: usize,
        new_status: Status,
        result: Option<TradeOutcome>,
    ) -> Result<(), LedgerError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        let len: i64 = tx
            .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .map_err(query_err)?;
        let len = len as usize;
        if index >= len {
            tracing::warn!(index, len, "status update rejected");
            return Err(LedgerError::IndexOutOfRange {
                index: index as i64,
                len,
            });
        }

        let stored = tx
            .query_row(
                "SELECT id, timestamp, title, action, summary, status, result
                 FROM trades ORDER BY id ASC LIMIT 1 OFFSET ?1",
                params![index as i64],
                read_row,
            )
            .map_err(query_err)?;

        let mut record = to_record(index, &stored)?;
        lifecycle::apply_transition(&mut record, index, new_status, result)?;

        tx.execute(
            "UPDATE trades SET status = ?1, result = ?2 WHERE id = ?3",
            params![
                record.status.label(),
                record.result.map(|r| r.label()).unwrap_or(""),
                stored.0
            ],
        )
        .map_err(query_err)?;
        tx.commit().map_err(query_err)?;

        tracing::info!(index, status = %new_status, "updated trade status in sqlite");
        Ok(())
    }
}
