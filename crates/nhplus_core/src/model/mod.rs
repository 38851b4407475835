//! Care-records domain model.
//!
//! # Responsibility
//! - Define the patient, caregiver and treatment records persisted by core.
//! - Own the text formats used for persisted dates and times.
//!
//! # Invariants
//! - Identities are storage-assigned integers, absent before the first insert.
//! - Deletion is physical; there are no tombstones.

pub mod caregiver;
pub mod datetime;
pub mod patient;
pub mod person;
pub mod treatment;
