//! Store configuration.
//!
//! # Responsibility
//! - Describe where the care-records database lives and how it is opened.
//! - Carry the foreign-key delete policy applied when the schema is created.
//!
//! # Invariants
//! - The default location is the fixed local file `db/nursingHome.db`.
//! - The default delete policy is `Restrict`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default relative path of the care-records database file.
pub const DEFAULT_DB_PATH: &str = "db/nursingHome.db";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Physical location of the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbLocation {
    /// On-disk database file. Parent directories are created on open.
    File(PathBuf),
    /// Private in-memory database, discarded when the connection closes.
    Memory,
}

impl DbLocation {
    /// Short label used in log events (`mode=file|memory`).
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// `ON DELETE` action attached to both treatment foreign keys.
///
/// Only takes effect when the tables are first created; an existing database
/// keeps the policy it was created with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Deleting a referenced patient or caregiver fails.
    #[default]
    Restrict,
    /// Deleting a referenced patient or caregiver removes its treatments.
    Cascade,
}

impl DeletePolicy {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
        }
    }
}

/// Connection settings for the care-records store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub location: DbLocation,
    pub delete_policy: DeletePolicy,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: DbLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
            delete_policy: DeletePolicy::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Config for a file database at `path` with default policy and timeout.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: DbLocation::File(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Config for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
            ..Self::default()
        }
    }

    /// Returns a copy with a different delete policy.
    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
