//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Express the CRUD algorithm once (`crud`) and specialise it per entity.
//! - Classify SQLite failures into storage errors and integrity violations.
//!
//! # Invariants
//! - Read-by-key returns `Ok(None)` for a missing row, never an error.
//! - Statement failures always surface as `RepoError`; the only swallowed
//!   failure is the caregiver lookup fallback in the treatment repository.

use crate::db::DbError;
use crate::model::treatment::TreatmentValidationError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod caregiver_repo;
pub mod crud;
pub mod factory;
pub mod patient_repo;
pub mod treatment_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository operation, carried by errors for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOp {
    Create,
    ReadByKey,
    ReadAll,
    ReadByPatient,
    Update,
    DeleteByKey,
}

impl RepoOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ReadByKey => "read_by_key",
            Self::ReadAll => "read_all",
            Self::ReadByPatient => "read_by_patient",
            Self::Update => "update",
            Self::DeleteByKey => "delete_by_key",
        }
    }
}

/// Persisted entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Patient,
    Caregiver,
    Treatment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Caregiver => "caregiver",
            Self::Treatment => "treatment",
        }
    }
}

/// Which statement failed, on which entity and identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementContext {
    pub op: RepoOp,
    pub entity: EntityKind,
    pub key: Option<i64>,
}

impl StatementContext {
    pub fn new(op: RepoOp, entity: EntityKind, key: Option<i64>) -> Self {
        Self { op, entity, key }
    }
}

impl Display for StatementContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.op.as_str(), self.entity.as_str())?;
        if let Some(key) = self.key {
            write!(f, " #{key}")?;
        }
        Ok(())
    }
}

/// Repository error for care-records persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Connection-level failure outside any statement (e.g. released store).
    Db(DbError),
    /// A statement failed to prepare, execute or step.
    Storage {
        context: StatementContext,
        source: DbError,
    },
    /// A foreign-key constraint rejected the statement.
    IntegrityViolation {
        context: StatementContext,
        message: String,
    },
    /// The record was rejected before any SQL ran.
    Validation(TreatmentValidationError),
    /// Update was requested for a record that was never persisted.
    MissingIdentity(EntityKind),
    /// A persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl RepoError {
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }

    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, Self::Db(DbError::ConnectionUnavailable))
    }

    pub fn context(&self) -> Option<StatementContext> {
        match self {
            Self::Storage { context, .. } | Self::IntegrityViolation { context, .. } => {
                Some(*context)
            }
            _ => None,
        }
    }

    /// Attaches statement context to raw SQLite failures and logs them.
    pub(crate) fn in_context(self, context: StatementContext) -> Self {
        let classified = match self {
            Self::Db(DbError::Sqlite(err)) => classify_sqlite(context, err),
            other => other,
        };
        error!(
            "event=repo_statement module=repo status=error op={} entity={} key={} error_code={} error={}",
            context.op.as_str(),
            context.entity.as_str(),
            context
                .key
                .map_or_else(|| "-".to_string(), |key| key.to_string()),
            classified.code(),
            classified
        );
        classified
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_unavailable",
            Self::Storage { .. } => "storage_failed",
            Self::IntegrityViolation { .. } => "integrity_violation",
            Self::Validation(_) => "validation_failed",
            Self::MissingIdentity(_) => "missing_identity",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

fn classify_sqlite(context: StatementContext, err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
            return RepoError::IntegrityViolation {
                context,
                message: message.clone().unwrap_or_else(|| failure.to_string()),
            };
        }
    }
    RepoError::Storage {
        context,
        source: DbError::Sqlite(err),
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Storage { context, source } => write!(f, "{context} failed: {source}"),
            Self::IntegrityViolation { context, message } => {
                write!(f, "{context} violates referential integrity: {message}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingIdentity(entity) => {
                write!(f, "{} has no storage identity yet", entity.as_str())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Storage { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            Self::IntegrityViolation { .. } | Self::MissingIdentity(_) | Self::InvalidData(_) => {
                None
            }
        }
    }
}

impl From<TreatmentValidationError> for RepoError {
    fn from(value: TreatmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
