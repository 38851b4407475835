//! Treatment repository with caregiver display projection.
//!
//! # Responsibility
//! - Persist treatments with both foreign keys.
//! - Attach caregiver surname/first name/phone to every treatment it returns.
//!
//! # Invariants
//! - `read_all`/`read_by_key` join caregiver in SQL; `read_by_patient` reads
//!   the bare table and resolves each caregiver through the caregiver
//!   repository. Both paths return the same shape.
//! - A caregiver that cannot be resolved yields `CaregiverDisplay::unresolved()`
//!   instead of an error.
//! - Write statements never touch caregiver display fields.
//! - Reads are ordered by `tid`.

use crate::model::caregiver::CaregiverId;
use crate::model::datetime;
use crate::model::patient::PatientId;
use crate::model::treatment::{CaregiverDisplay, Treatment, TreatmentId};
use crate::repo::caregiver_repo::SqliteCaregiverRepository;
use crate::repo::crud::{
    self, required_text, text_or_empty, RecordMapping, Repository, SqlCommand,
};
use crate::repo::{EntityKind, RepoError, RepoOp, RepoResult, StatementContext};
use log::warn;
use rusqlite::{Connection, Row};

const TREATMENT_COLUMNS_SQL: &str = "t.tid,
    t.pid,
    t.treatment_date,
    t.\"begin\",
    t.\"end\",
    t.description,
    t.remark,
    t.cid";

/// SQLite-backed treatment repository.
pub struct SqliteTreatmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTreatmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists treatments of one patient, ordered by `tid`.
    ///
    /// Uses the non-joined statement and looks caregivers up one row at a
    /// time; an unknown patient yields an empty list.
    pub fn read_by_patient(&self, pid: PatientId) -> RepoResult<Vec<Treatment>> {
        let context =
            StatementContext::new(RepoOp::ReadByPatient, EntityKind::Treatment, Some(pid));
        let command = SqlCommand::new(format!(
            "SELECT {TREATMENT_COLUMNS_SQL}
             FROM treatment t
             WHERE t.pid = ?1
             ORDER BY t.tid ASC;"
        ))
        .bind(pid);

        let treatments = crud::query_rows(self.conn, context, &command, parse_treatment_row)?;
        Ok(treatments
            .into_iter()
            .map(|treatment| {
                let display = self.resolve_caregiver(treatment.cid);
                treatment.attach_caregiver(display)
            })
            .collect())
    }

    fn resolve_caregiver(&self, cid: CaregiverId) -> CaregiverDisplay {
        match SqliteCaregiverRepository::new(self.conn).read_by_key(cid) {
            Ok(Some(caregiver)) => CaregiverDisplay::from(&caregiver),
            Ok(None) => {
                warn!(
                    "event=caregiver_lookup module=repo status=fallback cid={cid} reason=not_found"
                );
                CaregiverDisplay::unresolved()
            }
            Err(err) => {
                warn!(
                    "event=caregiver_lookup module=repo status=fallback cid={cid} reason=error error={err}"
                );
                CaregiverDisplay::unresolved()
            }
        }
    }

    fn joined_select(filter: &str) -> String {
        format!(
            "SELECT {TREATMENT_COLUMNS_SQL},
                c.cid AS caregiver_cid,
                c.surname AS caregiver_surname,
                c.firstname AS caregiver_firstname,
                c.phonenumber AS caregiver_phonenumber
             FROM treatment t
             LEFT JOIN caregiver c ON c.cid = t.cid
             {filter}
             ORDER BY t.tid ASC;"
        )
    }
}

impl RecordMapping for SqliteTreatmentRepository<'_> {
    type Record = Treatment;

    const ENTITY: EntityKind = EntityKind::Treatment;

    fn connection(&self) -> &Connection {
        self.conn
    }

    fn record_key(record: &Treatment) -> Option<i64> {
        record.tid()
    }

    fn create_statement(&self, treatment: &Treatment) -> RepoResult<SqlCommand> {
        treatment.validate()?;
        Ok(SqlCommand::new(
            "INSERT INTO treatment (pid, treatment_date, \"begin\", \"end\", description, remark, cid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        )
        .bind(treatment.pid)
        .bind(treatment.date_text())
        .bind(treatment.begin_text())
        .bind(treatment.end_text())
        .bind(treatment.description.clone())
        .bind(treatment.remarks.clone())
        .bind(treatment.cid))
    }

    fn read_by_key_statement(&self, tid: TreatmentId) -> SqlCommand {
        SqlCommand::new(Self::joined_select("WHERE t.tid = ?1")).bind(tid)
    }

    fn read_all_statement(&self) -> SqlCommand {
        SqlCommand::new(Self::joined_select(""))
    }

    fn update_statement(&self, treatment: &Treatment) -> RepoResult<SqlCommand> {
        let tid = treatment
            .tid()
            .ok_or(RepoError::MissingIdentity(EntityKind::Treatment))?;
        treatment.validate()?;
        Ok(SqlCommand::new(
            "UPDATE treatment
             SET
                pid = ?1,
                treatment_date = ?2,
                \"begin\" = ?3,
                \"end\" = ?4,
                description = ?5,
                remark = ?6,
                cid = ?7
             WHERE tid = ?8;",
        )
        .bind(treatment.pid)
        .bind(treatment.date_text())
        .bind(treatment.begin_text())
        .bind(treatment.end_text())
        .bind(treatment.description.clone())
        .bind(treatment.remarks.clone())
        .bind(treatment.cid)
        .bind(tid))
    }

    fn delete_statement(&self, tid: TreatmentId) -> SqlCommand {
        SqlCommand::new("DELETE FROM treatment WHERE tid = ?1;").bind(tid)
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Treatment> {
        let treatment = parse_treatment_row(row)?;
        let display = match row.get::<_, Option<CaregiverId>>("caregiver_cid")? {
            Some(_) => CaregiverDisplay {
                surname: text_or_empty(row, "caregiver_surname")?,
                first_name: text_or_empty(row, "caregiver_firstname")?,
                phone_number: text_or_empty(row, "caregiver_phonenumber")?,
            },
            None => {
                warn!(
                    "event=caregiver_lookup module=repo status=fallback cid={} reason=not_found",
                    treatment.cid
                );
                CaregiverDisplay::unresolved()
            }
        };
        Ok(treatment.attach_caregiver(display))
    }
}

fn parse_treatment_row(row: &Row<'_>) -> RepoResult<Treatment> {
    let date_text = required_text(row, "treatment", "treatment_date")?;
    let date = datetime::parse_date(&date_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in treatment.treatment_date"
        ))
    })?;
    let begin = parse_time_column(row, "begin")?;
    let end = parse_time_column(row, "end")?;

    Ok(Treatment::with_id(
        row.get("tid")?,
        row.get("pid")?,
        row.get("cid")?,
        date,
        begin,
        end,
        text_or_empty(row, "description")?,
        text_or_empty(row, "remark")?,
    ))
}

fn parse_time_column(row: &Row<'_>, column: &str) -> RepoResult<chrono::NaiveTime> {
    let text = required_text(row, "treatment", column)?;
    datetime::parse_time(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid time `{text}` in treatment.{column}"))
    })
}
