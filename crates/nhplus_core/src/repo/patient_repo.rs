//! Patient repository over the `patient` table.

use crate::model::datetime;
use crate::model::patient::{Patient, PatientId};
use crate::model::person::Person;
use crate::repo::crud::{required_text, text_or_empty, RecordMapping, SqlCommand};
use crate::repo::{EntityKind, RepoError, RepoResult};
use rusqlite::{Connection, Row};

const PATIENT_SELECT_SQL: &str = "SELECT
    pid,
    firstname,
    surname,
    birthdate,
    carelevel,
    roomnumber
FROM patient";

/// SQLite-backed patient repository.
pub struct SqlitePatientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePatientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordMapping for SqlitePatientRepository<'_> {
    type Record = Patient;

    const ENTITY: EntityKind = EntityKind::Patient;

    fn connection(&self) -> &Connection {
        self.conn
    }

    fn record_key(record: &Patient) -> Option<i64> {
        record.pid()
    }

    fn create_statement(&self, patient: &Patient) -> RepoResult<SqlCommand> {
        Ok(SqlCommand::new(
            "INSERT INTO patient (firstname, surname, birthdate, carelevel, roomnumber)
             VALUES (?1, ?2, ?3, ?4, ?5);",
        )
        .bind(patient.person.first_name.clone())
        .bind(patient.person.surname.clone())
        .bind(patient.birth_date_text())
        .bind(patient.care_level.clone())
        .bind(patient.room_number.clone()))
    }

    fn read_by_key_statement(&self, pid: PatientId) -> SqlCommand {
        SqlCommand::new(format!("{PATIENT_SELECT_SQL} WHERE pid = ?1;")).bind(pid)
    }

    fn read_all_statement(&self) -> SqlCommand {
        SqlCommand::new(format!("{PATIENT_SELECT_SQL} ORDER BY pid ASC;"))
    }

    fn update_statement(&self, patient: &Patient) -> RepoResult<SqlCommand> {
        let pid = patient
            .pid()
            .ok_or(RepoError::MissingIdentity(EntityKind::Patient))?;
        Ok(SqlCommand::new(
            "UPDATE patient
             SET
                firstname = ?1,
                surname = ?2,
                birthdate = ?3,
                carelevel = ?4,
                roomnumber = ?5
             WHERE pid = ?6;",
        )
        .bind(patient.person.first_name.clone())
        .bind(patient.person.surname.clone())
        .bind(patient.birth_date_text())
        .bind(patient.care_level.clone())
        .bind(patient.room_number.clone())
        .bind(pid))
    }

    fn delete_statement(&self, pid: PatientId) -> SqlCommand {
        SqlCommand::new("DELETE FROM patient WHERE pid = ?1;").bind(pid)
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Patient> {
        let birth_text = required_text(row, "patient", "birthdate")?;
        let birth_date = datetime::parse_date(&birth_text).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{birth_text}` in patient.birthdate"
            ))
        })?;

        Ok(Patient::with_id(
            row.get("pid")?,
            Person::new(
                text_or_empty(row, "firstname")?,
                text_or_empty(row, "surname")?,
            ),
            birth_date,
            text_or_empty(row, "carelevel")?,
            text_or_empty(row, "roomnumber")?,
        ))
    }
}
