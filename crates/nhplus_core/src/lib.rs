//! Data-access core for nursing-home care records.
//! This crate is the single source of truth for persistence invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{DbLocation, DeletePolicy, StoreConfig};
pub use db::{ConnectionGuard, ConnectionManager, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::caregiver::{Caregiver, CaregiverId};
pub use model::patient::{Patient, PatientId};
pub use model::person::Person;
pub use model::treatment::{CaregiverDisplay, Treatment, TreatmentId, TreatmentValidationError};
pub use repo::caregiver_repo::SqliteCaregiverRepository;
pub use repo::crud::{RecordMapping, Repository, SqlCommand};
pub use repo::factory::RepositoryFactory;
pub use repo::patient_repo::SqlitePatientRepository;
pub use repo::treatment_repo::SqliteTreatmentRepository;
pub use repo::{EntityKind, RepoError, RepoOp, RepoResult, StatementContext};
pub use service::care_service::{CareService, NewTreatment, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
