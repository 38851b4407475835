//! Shared connection ownership.
//!
//! # Responsibility
//! - Own the one live SQLite connection used by every repository.
//! - Open it lazily (or eagerly via `start`) and close it at shutdown.
//!
//! # Invariants
//! - At most one connection exists per manager; every `acquire` between two
//!   `release` calls hands out the same instance.
//! - The create-if-absent check runs under the manager lock.
//! - `release` is idempotent.
//! - Repositories borrow the connection and never close it.

use super::open::open_db;
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::Connection;
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard};

/// Owner of the single connection to the care-records store.
///
/// Construct one at process start, pass references to whoever needs
/// repositories, and call [`ConnectionManager::release`] at orderly shutdown.
pub struct ConnectionManager {
    config: StoreConfig,
    slot: Mutex<Option<Connection>>,
}

/// Exclusive borrow of the shared connection.
///
/// Statements on the connection run strictly one after another; other callers
/// of `acquire` block until this guard is dropped.
///
/// The guard holds the manager lock: calling `acquire` or `try_acquire` on the
/// same manager while a guard is alive on the current thread deadlocks. Drop
/// it (or let its scope end) first.
pub struct ConnectionGuard<'a> {
    slot: MutexGuard<'a, Option<Connection>>,
}

impl Deref for ConnectionGuard<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        match self.slot.as_ref() {
            Some(conn) => conn,
            None => unreachable!("connection guard is only built over an open slot"),
        }
    }
}

impl ConnectionManager {
    /// Creates a manager without opening the store yet.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    /// Creates a manager and opens the store immediately.
    ///
    /// # Errors
    /// - Returns the open/bootstrap failure so startup can abort instead of
    ///   continuing without a usable connection.
    pub fn start(config: StoreConfig) -> DbResult<Self> {
        let manager = Self::new(config);
        drop(manager.acquire()?);
        Ok(manager)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the shared connection, opening it first when absent.
    ///
    /// Must not be called again on the same thread while a guard from this
    /// manager is still alive.
    pub fn acquire(&self) -> DbResult<ConnectionGuard<'_>> {
        let mut slot = self.lock()?;
        if slot.is_none() {
            *slot = Some(open_db(&self.config)?);
        }
        Ok(ConnectionGuard { slot })
    }

    /// Returns the shared connection only when it is already open.
    ///
    /// # Errors
    /// - `ConnectionUnavailable` before the first `acquire` or after `release`.
    pub fn try_acquire(&self) -> DbResult<ConnectionGuard<'_>> {
        let slot = self.lock()?;
        if slot.is_none() {
            return Err(DbError::ConnectionUnavailable);
        }
        Ok(ConnectionGuard { slot })
    }

    /// Closes the shared connection when open and clears it.
    ///
    /// Calling this before any `acquire`, or twice, is a no-op. On a failed
    /// close the connection stays cached and the error is returned.
    pub fn release(&self) -> DbResult<()> {
        let mut slot = self.lock()?;
        let Some(conn) = slot.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!(
                    "event=db_close module=db status=ok mode={}",
                    self.config.location.mode()
                );
                Ok(())
            }
            Err((conn, err)) => {
                error!(
                    "event=db_close module=db status=error mode={} error={}",
                    self.config.location.mode(),
                    err
                );
                *slot = Some(conn);
                Err(err.into())
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Option<Connection>>> {
        self.slot.lock().map_err(|_| DbError::LockPoisoned)
    }
}
