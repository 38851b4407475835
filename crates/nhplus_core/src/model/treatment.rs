//! Treatment domain model.
//!
//! # Responsibility
//! - Describe one care session linking a patient and a caregiver.
//! - Carry a read-only caregiver projection for display.
//!
//! # Invariants
//! - `tid` is `None` until storage assigns it, then never changes.
//! - `begin`/`end` carry minute precision only, matching the `HH:mm` text
//!   they are stored as; `end` must be strictly later than `begin`.
//! - The caregiver projection is attached by repository reads only; write
//!   paths persist `pid`/`cid` and the treatment's own fields, nothing else.

use crate::model::caregiver::{Caregiver, CaregiverId};
use crate::model::datetime;
use crate::model::patient::PatientId;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned treatment identity.
pub type TreatmentId = i64;

/// Validation errors for treatment write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreatmentValidationError {
    /// Session does not end strictly after it begins.
    EndNotAfterBegin { begin: NaiveTime, end: NaiveTime },
    /// Description is empty or whitespace only.
    BlankDescription,
    /// A session boundary carries seconds that `HH:mm` storage would drop.
    SubMinutePrecision { time: NaiveTime },
}

impl Display for TreatmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndNotAfterBegin { begin, end } => write!(
                f,
                "treatment end {} must be later than begin {}",
                datetime::format_time(*end),
                datetime::format_time(*begin)
            ),
            Self::BlankDescription => write!(f, "treatment description must not be blank"),
            Self::SubMinutePrecision { time } => write!(
                f,
                "treatment time {} has seconds; only whole minutes are stored",
                time.format("%H:%M:%S%.f")
            ),
        }
    }
}

impl Error for TreatmentValidationError {}

/// Caregiver display fields copied onto a treatment at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverDisplay {
    pub surname: String,
    pub first_name: String,
    pub phone_number: String,
}

impl CaregiverDisplay {
    /// Placeholder used when the referenced caregiver cannot be resolved.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_unresolved(&self) -> bool {
        self.surname.is_empty() && self.first_name.is_empty() && self.phone_number.is_empty()
    }
}

impl From<&Caregiver> for CaregiverDisplay {
    fn from(caregiver: &Caregiver) -> Self {
        Self {
            surname: caregiver.surname().to_string(),
            first_name: caregiver.first_name().to_string(),
            phone_number: caregiver.phone_number.clone(),
        }
    }
}

/// One care session of a patient with a caregiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    tid: Option<TreatmentId>,
    pub pid: PatientId,
    pub cid: CaregiverId,
    pub date: NaiveDate,
    #[serde(with = "datetime::hhmm")]
    pub begin: NaiveTime,
    #[serde(with = "datetime::hhmm")]
    pub end: NaiveTime,
    pub description: String,
    pub remarks: String,
    #[serde(skip_deserializing)]
    caregiver: Option<CaregiverDisplay>,
}

impl Treatment {
    /// Creates a treatment that has not been persisted yet.
    ///
    /// `begin` and `end` are truncated to whole minutes.
    pub fn new(
        pid: PatientId,
        cid: CaregiverId,
        date: NaiveDate,
        begin: NaiveTime,
        end: NaiveTime,
        description: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            tid: None,
            pid,
            cid,
            date,
            begin: datetime::truncate_to_minute(begin),
            end: datetime::truncate_to_minute(end),
            description: description.into(),
            remarks: remarks.into(),
            caregiver: None,
        }
    }

    /// Creates a treatment carrying an existing storage identity.
    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        tid: TreatmentId,
        pid: PatientId,
        cid: CaregiverId,
        date: NaiveDate,
        begin: NaiveTime,
        end: NaiveTime,
        description: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            tid: Some(tid),
            ..Self::new(pid, cid, date, begin, end, description, remarks)
        }
    }

    pub fn tid(&self) -> Option<TreatmentId> {
        self.tid
    }

    /// Caregiver display fields, present on every treatment read from storage.
    pub fn caregiver(&self) -> Option<&CaregiverDisplay> {
        self.caregiver.as_ref()
    }

    pub(crate) fn attach_caregiver(mut self, display: CaregiverDisplay) -> Self {
        self.caregiver = Some(display);
        self
    }

    /// Session length (`end - begin`).
    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }

    pub fn date_text(&self) -> String {
        datetime::format_date(self.date)
    }

    pub fn begin_text(&self) -> String {
        datetime::format_time(self.begin)
    }

    pub fn end_text(&self) -> String {
        datetime::format_time(self.end)
    }

    /// Validates write-path invariants.
    pub fn validate(&self) -> Result<(), TreatmentValidationError> {
        for time in [self.begin, self.end] {
            if !datetime::is_whole_minute(time) {
                return Err(TreatmentValidationError::SubMinutePrecision { time });
            }
        }
        if self.end <= self.begin {
            return Err(TreatmentValidationError::EndNotAfterBegin {
                begin: self.begin,
                end: self.end,
            });
        }
        if self.description.trim().is_empty() {
            return Err(TreatmentValidationError::BlankDescription);
        }
        Ok(())
    }
}
