//! Single access point for repositories bound to one connection.

use crate::repo::caregiver_repo::SqliteCaregiverRepository;
use crate::repo::patient_repo::SqlitePatientRepository;
use crate::repo::treatment_repo::SqliteTreatmentRepository;
use rusqlite::Connection;

/// Builds repositories that all borrow the same connection.
///
/// Typically built from a `ConnectionGuard` returned by
/// `ConnectionManager::acquire`. Keep one guard per unit of work and build
/// every repository from it; acquiring a second guard on the same thread while
/// the first is alive deadlocks.
#[derive(Clone, Copy)]
pub struct RepositoryFactory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> RepositoryFactory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn patients(&self) -> SqlitePatientRepository<'conn> {
        SqlitePatientRepository::new(self.conn)
    }

    pub fn caregivers(&self) -> SqliteCaregiverRepository<'conn> {
        SqliteCaregiverRepository::new(self.conn)
    }

    pub fn treatments(&self) -> SqliteTreatmentRepository<'conn> {
        SqliteTreatmentRepository::new(self.conn)
    }
}
