//! Patient domain model.
//!
//! # Invariants
//! - `pid` is assigned by storage and never changes afterwards.
//! - A patient referenced by a treatment cannot disappear under the restrict
//!   delete policy.

use crate::model::datetime;
use crate::model::person::Person;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage-assigned patient identity.
pub type PatientId = i64;

/// A resident of the care facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pid: Option<PatientId>,
    #[serde(flatten)]
    pub person: Person,
    pub birth_date: NaiveDate,
    pub care_level: String,
    pub room_number: String,
}

impl Patient {
    /// Creates a patient that has not been persisted yet.
    pub fn new(
        person: Person,
        birth_date: NaiveDate,
        care_level: impl Into<String>,
        room_number: impl Into<String>,
    ) -> Self {
        Self {
            pid: None,
            person,
            birth_date,
            care_level: care_level.into(),
            room_number: room_number.into(),
        }
    }

    /// Creates a patient carrying an existing storage identity.
    pub fn with_id(
        pid: PatientId,
        person: Person,
        birth_date: NaiveDate,
        care_level: impl Into<String>,
        room_number: impl Into<String>,
    ) -> Self {
        Self {
            pid: Some(pid),
            ..Self::new(person, birth_date, care_level, room_number)
        }
    }

    pub fn pid(&self) -> Option<PatientId> {
        self.pid
    }

    pub fn first_name(&self) -> &str {
        &self.person.first_name
    }

    pub fn surname(&self) -> &str {
        &self.person.surname
    }

    /// Birth date in the persisted `yyyy-MM-dd` form.
    pub fn birth_date_text(&self) -> String {
        datetime::format_date(self.birth_date)
    }
}
