//! SQLite storage bootstrap and connection lifecycle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the care-records store.
//! - Create the patient/caregiver/treatment schema when absent.
//! - Own the single shared connection through `ConnectionManager`.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON`.
//! - Application data is never read or written before the schema exists.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod connection;
mod open;
pub mod schema;

pub use connection::{ConnectionGuard, ConnectionManager};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Database directory could not be prepared.
    Io(std::io::Error),
    /// The engine accepted `PRAGMA foreign_keys = ON` but does not enforce it.
    ForeignKeysNotEnforced,
    /// No open connection is available (never opened, or released).
    ConnectionUnavailable,
    /// A thread panicked while holding the connection lock.
    LockPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "database directory error: {err}"),
            Self::ForeignKeysNotEnforced => {
                write!(f, "sqlite connection does not enforce foreign keys")
            }
            Self::ConnectionUnavailable => write!(f, "database connection is not available"),
            Self::LockPoisoned => write!(f, "database connection lock is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::ForeignKeysNotEnforced | Self::ConnectionUnavailable | Self::LockPoisoned => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
