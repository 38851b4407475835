//! Caregiver domain model.
//!
//! # Invariants
//! - `cid` is assigned by storage and never changes afterwards.
//! - Inactive caregivers stay valid treatment references; they are only
//!   hidden from new-assignment selection.

use crate::model::person::Person;
use serde::{Deserialize, Serialize};

/// Storage-assigned caregiver identity.
pub type CaregiverId = i64;

/// A member of the nursing staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caregiver {
    cid: Option<CaregiverId>,
    #[serde(flatten)]
    pub person: Person,
    pub phone_number: String,
    pub active: bool,
}

impl Caregiver {
    /// Creates an active caregiver that has not been persisted yet.
    pub fn new(person: Person, phone_number: impl Into<String>) -> Self {
        Self {
            cid: None,
            person,
            phone_number: phone_number.into(),
            active: true,
        }
    }

    /// Creates a caregiver carrying an existing storage identity.
    pub fn with_id(
        cid: CaregiverId,
        person: Person,
        phone_number: impl Into<String>,
        active: bool,
    ) -> Self {
        Self {
            cid: Some(cid),
            person,
            phone_number: phone_number.into(),
            active,
        }
    }

    pub fn cid(&self) -> Option<CaregiverId> {
        self.cid
    }

    pub fn first_name(&self) -> &str {
        &self.person.first_name
    }

    pub fn surname(&self) -> &str {
        &self.person.surname
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Filters a caregiver list down to the ones offered for new assignments.
    pub fn active_only(caregivers: &[Caregiver]) -> Vec<&Caregiver> {
        caregivers.iter().filter(|item| item.is_active()).collect()
    }
}
