//! Care-records schema definition.
//!
//! # Responsibility
//! - Create `patient`, `caregiver` and `treatment` tables when absent.
//!
//! # Invariants
//! - DDL is idempotent (`IF NOT EXISTS`); existing tables are never altered.
//! - Both treatment foreign keys are `NOT NULL` and carry the configured
//!   `ON DELETE` action.
//! - Dates are stored as `yyyy-MM-dd` text, times as `HH:mm` text.

use crate::config::DeletePolicy;
use crate::db::DbResult;
use rusqlite::Connection;

/// Tables the data-access layer expects, in dependency order.
pub const TABLES: [&str; 3] = ["patient", "caregiver", "treatment"];

/// Creates all care-records tables that do not exist yet.
pub fn apply_schema(conn: &Connection, policy: DeletePolicy) -> DbResult<()> {
    conn.execute_batch(&schema_sql(policy))?;
    Ok(())
}

fn schema_sql(policy: DeletePolicy) -> String {
    let on_delete = policy.as_sql();
    format!(
        r#"CREATE TABLE IF NOT EXISTS patient (
            pid INTEGER PRIMARY KEY,
            firstname TEXT NOT NULL,
            surname TEXT NOT NULL,
            birthdate TEXT NOT NULL,
            carelevel TEXT NOT NULL,
            roomnumber TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS caregiver (
            cid INTEGER PRIMARY KEY,
            firstname TEXT NOT NULL,
            surname TEXT NOT NULL,
            phonenumber TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1 CHECK (active IN (0, 1))
        );

        CREATE TABLE IF NOT EXISTS treatment (
            tid INTEGER PRIMARY KEY,
            pid INTEGER NOT NULL REFERENCES patient (pid) ON DELETE {on_delete},
            treatment_date TEXT NOT NULL,
            "begin" TEXT NOT NULL,
            "end" TEXT NOT NULL,
            description TEXT NOT NULL,
            remark TEXT NOT NULL,
            cid INTEGER NOT NULL REFERENCES caregiver (cid) ON DELETE {on_delete}
        );

        CREATE INDEX IF NOT EXISTS idx_treatment_pid ON treatment (pid);
        CREATE INDEX IF NOT EXISTS idx_treatment_cid ON treatment (cid);"#
    )
}
