//! Caregiver repository over the `caregiver` table.
//!
//! Returns active and inactive caregivers alike; narrowing to the
//! assignment-selection view is left to `Caregiver::active_only`.

use crate::model::caregiver::{Caregiver, CaregiverId};
use crate::model::person::Person;
use crate::repo::crud::{bool_to_int, text_or_empty, RecordMapping, SqlCommand};
use crate::repo::{EntityKind, RepoError, RepoResult};
use rusqlite::{Connection, Row};

const CAREGIVER_SELECT_SQL: &str = "SELECT
    cid,
    firstname,
    surname,
    phonenumber,
    active
FROM caregiver";

/// SQLite-backed caregiver repository.
pub struct SqliteCaregiverRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCaregiverRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordMapping for SqliteCaregiverRepository<'_> {
    type Record = Caregiver;

    const ENTITY: EntityKind = EntityKind::Caregiver;

    fn connection(&self) -> &Connection {
        self.conn
    }

    fn record_key(record: &Caregiver) -> Option<i64> {
        record.cid()
    }

    fn create_statement(&self, caregiver: &Caregiver) -> RepoResult<SqlCommand> {
        Ok(SqlCommand::new(
            "INSERT INTO caregiver (firstname, surname, phonenumber, active)
             VALUES (?1, ?2, ?3, ?4);",
        )
        .bind(caregiver.person.first_name.clone())
        .bind(caregiver.person.surname.clone())
        .bind(caregiver.phone_number.clone())
        .bind(bool_to_int(caregiver.active)))
    }

    fn read_by_key_statement(&self, cid: CaregiverId) -> SqlCommand {
        SqlCommand::new(format!("{CAREGIVER_SELECT_SQL} WHERE cid = ?1;")).bind(cid)
    }

    fn read_all_statement(&self) -> SqlCommand {
        SqlCommand::new(format!("{CAREGIVER_SELECT_SQL} ORDER BY cid ASC;"))
    }

    fn update_statement(&self, caregiver: &Caregiver) -> RepoResult<SqlCommand> {
        let cid = caregiver
            .cid()
            .ok_or(RepoError::MissingIdentity(EntityKind::Caregiver))?;
        Ok(SqlCommand::new(
            "UPDATE caregiver
             SET
                firstname = ?1,
                surname = ?2,
                phonenumber = ?3,
                active = ?4
             WHERE cid = ?5;",
        )
        .bind(caregiver.person.first_name.clone())
        .bind(caregiver.person.surname.clone())
        .bind(caregiver.phone_number.clone())
        .bind(bool_to_int(caregiver.active))
        .bind(cid))
    }

    fn delete_statement(&self, cid: CaregiverId) -> SqlCommand {
        SqlCommand::new("DELETE FROM caregiver WHERE cid = ?1;").bind(cid)
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Caregiver> {
        let active = match row.get::<_, Option<i64>>("active")? {
            Some(0) => false,
            Some(1) => true,
            None => {
                return Err(RepoError::InvalidData(
                    "missing value in caregiver.active".to_string(),
                ));
            }
            Some(other) => {
                return Err(RepoError::InvalidData(format!(
                    "invalid active value `{other}` in caregiver.active"
                )));
            }
        };

        Ok(Caregiver::with_id(
            row.get("cid")?,
            Person::new(
                text_or_empty(row, "firstname")?,
                text_or_empty(row, "surname")?,
            ),
            text_or_empty(row, "phonenumber")?,
            active,
        ))
    }
}
