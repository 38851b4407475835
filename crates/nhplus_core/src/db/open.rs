//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by the data-access layer.
//! - Create the care-records schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, verified by read-back.
//! - Returned connections have all care-records tables present.

use super::schema::apply_schema;
use super::{DbError, DbResult};
use crate::config::{DbLocation, StoreConfig};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Opens the store described by `config` and prepares it for use.
///
/// # Side effects
/// - Creates the parent directory of a file database when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = config.location.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match connect(&config.location) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    match bootstrap_connection(&conn, config) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a private in-memory store with default settings.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db(&StoreConfig::in_memory())
}

fn connect(location: &DbLocation) -> DbResult<Connection> {
    match location {
        DbLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Connection::open(path)?)
        }
        DbLocation::Memory => Ok(Connection::open_in_memory()?),
    }
}

fn bootstrap_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    let enforced: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if enforced != 1 {
        return Err(DbError::ForeignKeysNotEnforced);
    }
    conn.busy_timeout(config.busy_timeout())?;
    apply_schema(conn, config.delete_policy)?;
    Ok(())
}
