//! Care-records use-case service.
//!
//! # Responsibility
//! - Offer the selections and writes the treatment screens need on top of the
//!   repositories.
//! - Return a freshly created treatment with identity and caregiver fields.
//!
//! # Invariants
//! - New treatments may only be assigned to active caregivers.
//! - Service APIs never bypass repository validation or persistence contracts.

use crate::model::caregiver::{Caregiver, CaregiverId};
use crate::model::patient::PatientId;
use crate::model::treatment::{Treatment, TreatmentId};
use crate::repo::crud::Repository;
use crate::repo::factory::RepositoryFactory;
use crate::repo::RepoError;
use chrono::{NaiveDate, NaiveTime};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for care-records use-cases.
#[derive(Debug)]
pub enum ServiceError {
    PatientNotFound(PatientId),
    CaregiverNotFound(CaregiverId),
    /// Caregiver exists but is not offered for new assignments.
    CaregiverInactive(CaregiverId),
    /// Treatment vanished between write and read-back.
    TreatmentNotFound(TreatmentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatientNotFound(pid) => write!(f, "patient not found: {pid}"),
            Self::CaregiverNotFound(cid) => write!(f, "caregiver not found: {cid}"),
            Self::CaregiverInactive(cid) => write!(f, "caregiver is inactive: {cid}"),
            Self::TreatmentNotFound(tid) => write!(f, "treatment not found: {tid}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for recording a new treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTreatment {
    pub pid: PatientId,
    pub cid: CaregiverId,
    pub date: NaiveDate,
    pub begin: NaiveTime,
    pub end: NaiveTime,
    pub description: String,
    pub remarks: String,
}

/// Use-case service over repositories sharing one connection.
pub struct CareService<'conn> {
    repos: RepositoryFactory<'conn>,
}

impl<'conn> CareService<'conn> {
    pub fn new(repos: RepositoryFactory<'conn>) -> Self {
        Self { repos }
    }

    /// Caregivers offered when assigning a new treatment.
    pub fn assignable_caregivers(&self) -> ServiceResult<Vec<Caregiver>> {
        let caregivers = self.repos.caregivers().read_all()?;
        Ok(Caregiver::active_only(&caregivers)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Records a treatment and returns it as stored.
    ///
    /// # Errors
    /// - `PatientNotFound` / `CaregiverNotFound` for unknown references.
    /// - `CaregiverInactive` when the caregiver is deactivated.
    /// - `Repo(Validation)` when `end` is not after `begin` or the
    ///   description is blank.
    pub fn record_treatment(&self, request: &NewTreatment) -> ServiceResult<Treatment> {
        if self.repos.patients().read_by_key(request.pid)?.is_none() {
            return Err(ServiceError::PatientNotFound(request.pid));
        }
        let caregiver = self
            .repos
            .caregivers()
            .read_by_key(request.cid)?
            .ok_or(ServiceError::CaregiverNotFound(request.cid))?;
        if !caregiver.is_active() {
            return Err(ServiceError::CaregiverInactive(request.cid));
        }

        let treatment = Treatment::new(
            request.pid,
            request.cid,
            request.date,
            request.begin,
            request.end,
            request.description.clone(),
            request.remarks.clone(),
        );
        let treatments = self.repos.treatments();
        let tid = treatments.create(&treatment)?;
        info!(
            "event=treatment_recorded module=service status=ok tid={tid} pid={} cid={}",
            request.pid, request.cid
        );

        treatments
            .read_by_key(tid)?
            .ok_or(ServiceError::TreatmentNotFound(tid))
    }

    /// All treatments, or only those of `patient` when given.
    pub fn treatments(&self, patient: Option<PatientId>) -> ServiceResult<Vec<Treatment>> {
        let treatments = self.repos.treatments();
        let list = match patient {
            Some(pid) => treatments.read_by_patient(pid)?,
            None => treatments.read_all()?,
        };
        Ok(list)
    }

    pub fn remove_treatment(&self, tid: TreatmentId) -> ServiceResult<()> {
        self.repos.treatments().delete_by_key(tid)?;
        Ok(())
    }
}
