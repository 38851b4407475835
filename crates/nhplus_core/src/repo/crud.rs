//! Generic CRUD algorithm shared by every repository.
//!
//! # Responsibility
//! - Define the per-entity capability set (`RecordMapping`): build statements,
//!   map rows.
//! - Implement create/read/update/delete once as free functions and expose
//!   them through the blanket `Repository` implementation.
//!
//! # Invariants
//! - Each call prepares its own statement; it is finalized on every exit path
//!   when the `Statement` drops.
//! - Update and delete of a missing identity are silent no-ops.
//! - `create` returns the storage-assigned identity.

use crate::repo::{EntityKind, RepoError, RepoOp, RepoResult, StatementContext};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row, Rows};

/// SQL text plus positional bind values for one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCommand {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlCommand {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Appends the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Statement builders and row mappers for one entity table.
pub trait RecordMapping {
    type Record;

    const ENTITY: EntityKind;

    /// Borrowed connection; never closed by the repository.
    fn connection(&self) -> &Connection;

    fn record_key(record: &Self::Record) -> Option<i64>;

    fn create_statement(&self, record: &Self::Record) -> RepoResult<SqlCommand>;

    fn read_by_key_statement(&self, key: i64) -> SqlCommand;

    fn read_all_statement(&self) -> SqlCommand;

    fn update_statement(&self, record: &Self::Record) -> RepoResult<SqlCommand>;

    fn delete_statement(&self, key: i64) -> SqlCommand;

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Self::Record>;

    fn map_rows(&self, mut rows: Rows<'_>) -> RepoResult<Vec<Self::Record>> {
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(self.map_row(row)?);
        }
        Ok(records)
    }
}

/// CRUD contract exposed to callers.
pub trait Repository {
    type Record;

    /// Inserts the record and returns its new identity.
    fn create(&self, record: &Self::Record) -> RepoResult<i64>;
    /// Returns the record with `key`, or `None` when no row matches.
    fn read_by_key(&self, key: i64) -> RepoResult<Option<Self::Record>>;
    fn read_all(&self) -> RepoResult<Vec<Self::Record>>;
    /// Replaces all persisted fields of the record keyed by its identity.
    fn update(&self, record: &Self::Record) -> RepoResult<()>;
    fn delete_by_key(&self, key: i64) -> RepoResult<()>;
}

impl<M: RecordMapping> Repository for M {
    type Record = M::Record;

    fn create(&self, record: &Self::Record) -> RepoResult<i64> {
        create(self, record)
    }

    fn read_by_key(&self, key: i64) -> RepoResult<Option<Self::Record>> {
        read_by_key(self, key)
    }

    fn read_all(&self) -> RepoResult<Vec<Self::Record>> {
        read_all(self)
    }

    fn update(&self, record: &Self::Record) -> RepoResult<()> {
        update(self, record)
    }

    fn delete_by_key(&self, key: i64) -> RepoResult<()> {
        delete_by_key(self, key)
    }
}

pub fn create<M: RecordMapping>(mapping: &M, record: &M::Record) -> RepoResult<i64> {
    let context = StatementContext::new(RepoOp::Create, M::ENTITY, M::record_key(record));
    within(context, || {
        let command = mapping.create_statement(record)?;
        let conn = mapping.connection();
        execute(conn, &command)?;
        Ok(conn.last_insert_rowid())
    })
}

pub fn read_by_key<M: RecordMapping>(mapping: &M, key: i64) -> RepoResult<Option<M::Record>> {
    let context = StatementContext::new(RepoOp::ReadByKey, M::ENTITY, Some(key));
    within(context, || {
        let command = mapping.read_by_key_statement(key);
        let mut stmt = mapping.connection().prepare(&command.sql)?;
        let mut rows = stmt.query(params_from_iter(command.params.iter()))?;
        let record = match rows.next()? {
            Some(row) => Some(mapping.map_row(row)?),
            None => None,
        };
        Ok(record)
    })
}

pub fn read_all<M: RecordMapping>(mapping: &M) -> RepoResult<Vec<M::Record>> {
    let context = StatementContext::new(RepoOp::ReadAll, M::ENTITY, None);
    within(context, || {
        let command = mapping.read_all_statement();
        let mut stmt = mapping.connection().prepare(&command.sql)?;
        let rows = stmt.query(params_from_iter(command.params.iter()))?;
        mapping.map_rows(rows)
    })
}

pub fn update<M: RecordMapping>(mapping: &M, record: &M::Record) -> RepoResult<()> {
    let key = M::record_key(record);
    let context = StatementContext::new(RepoOp::Update, M::ENTITY, key);
    within(context, || {
        if key.is_none() {
            return Err(RepoError::MissingIdentity(M::ENTITY));
        }
        let command = mapping.update_statement(record)?;
        let changed = execute(mapping.connection(), &command)?;
        log_noop(context, changed);
        Ok(())
    })
}

pub fn delete_by_key<M: RecordMapping>(mapping: &M, key: i64) -> RepoResult<()> {
    let context = StatementContext::new(RepoOp::DeleteByKey, M::ENTITY, Some(key));
    within(context, || {
        let command = mapping.delete_statement(key);
        let changed = execute(mapping.connection(), &command)?;
        log_noop(context, changed);
        Ok(())
    })
}

/// Runs an ad-hoc multi-row query outside the five CRUD statements.
pub fn query_rows<T>(
    conn: &Connection,
    context: StatementContext,
    command: &SqlCommand,
    mut map: impl FnMut(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    within(context, || {
        let mut stmt = conn.prepare(&command.sql)?;
        let mut rows = stmt.query(params_from_iter(command.params.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(map(row)?);
        }
        Ok(records)
    })
}

fn within<T>(context: StatementContext, body: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
    body().map_err(|err| err.in_context(context))
}

fn execute(conn: &Connection, command: &SqlCommand) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare(&command.sql)?;
    stmt.execute(params_from_iter(command.params.iter()))
}

fn log_noop(context: StatementContext, changed: usize) {
    if changed == 0 {
        debug!(
            "event=repo_statement module=repo status=noop op={} entity={} key={}",
            context.op.as_str(),
            context.entity.as_str(),
            context
                .key
                .map_or_else(|| "-".to_string(), |key| key.to_string())
        );
    }
}

/// Reads a nullable text column, mapping NULL to an empty string.
pub(crate) fn text_or_empty(row: &Row<'_>, column: &str) -> RepoResult<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

/// Reads a text column that must hold a value for the row to decode.
pub(crate) fn required_text(row: &Row<'_>, table: &str, column: &str) -> RepoResult<String> {
    row.get::<_, Option<String>>(column)?
        .ok_or_else(|| RepoError::InvalidData(format!("missing value in {table}.{column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
