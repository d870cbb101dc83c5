// src/db/ledger_store.rs
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

/// The ledger currently in use.
#[derive(Debug, Clone)]
pub struct StoredLedger {
    pub filename: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub bytes: Vec<u8>,
}

/// Metadata only, for status pages.
#[derive(Debug, Clone)]
pub struct LedgerInfo {
    pub filename: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub size: i64,
}

/// Replaces the stored ledger. Last upload wins.
pub fn replace_ledger(
    conn: &Connection,
    filename: Option<&str>,
    bytes: &[u8],
    now: DateTime<Utc>,
) -> Result<(), ServerError> {
    conn.execute(
        "insert or replace into ledger (id, filename, uploaded_at, bytes) values (1, ?, ?, ?)",
        params![filename, now, bytes],
    )
    .map_err(|e| ServerError::DbError(format!("store ledger failed: {e}")))?;
    Ok(())
}

pub fn load_ledger(conn: &Connection) -> Result<Option<StoredLedger>, ServerError> {
    conn.query_row(
        "select filename, uploaded_at, bytes from ledger where id = 1",
        [],
        |r| {
            Ok(StoredLedger {
                filename: r.get(0)?,
                uploaded_at: r.get(1)?,
                bytes: r.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("load ledger failed: {e}")))
}

pub fn ledger_info(conn: &Connection) -> Result<Option<LedgerInfo>, ServerError> {
    conn.query_row(
        "select filename, uploaded_at, length(bytes) from ledger where id = 1",
        [],
        |r| {
            Ok(LedgerInfo {
                filename: r.get(0)?,
                uploaded_at: r.get(1)?,
                size: r.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("ledger info failed: {e}")))
}
