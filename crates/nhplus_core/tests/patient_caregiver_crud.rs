use chrono::NaiveDate;
use nhplus_core::db::open_db_in_memory;
use nhplus_core::{
    Caregiver, EntityKind, Patient, Person, RepoError, Repository, RepositoryFactory,
};

#[test]
fn patient_create_and_read_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).patients();

    let patient = anna_muster();
    let pid = repo.create(&patient).unwrap();

    let loaded = repo.read_by_key(pid).unwrap().unwrap();
    assert_eq!(loaded.pid(), Some(pid));
    assert_eq!(loaded.first_name(), "Anna");
    assert_eq!(loaded.surname(), "Muster");
    assert_eq!(loaded.birth_date_text(), "2023-01-01");
    assert_eq!(loaded.care_level, "1");
    assert_eq!(loaded.room_number, "101");
}

#[test]
fn create_assigns_distinct_identities() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).patients();

    let first = repo.create(&anna_muster()).unwrap();
    let second = repo.create(&anna_muster()).unwrap();
    assert_ne!(first, second);
    assert_eq!(repo.read_all().unwrap().len(), 2);
}

#[test]
fn patient_update_overwrites_fields_and_is_repeatable() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).patients();

    let pid = repo.create(&anna_muster()).unwrap();
    let mut patient = repo.read_by_key(pid).unwrap().unwrap();
    patient.person.surname = "Muster-Meier".to_string();
    patient.care_level = "3".to_string();
    patient.room_number = "204".to_string();

    repo.update(&patient).unwrap();
    repo.update(&patient).unwrap();

    let loaded = repo.read_by_key(pid).unwrap().unwrap();
    assert_eq!(loaded, patient);
}

#[test]
fn update_of_unknown_identity_is_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).patients();

    let ghost = Patient::with_id(
        4711,
        Person::new("Nie", "Da"),
        NaiveDate::from_ymd_opt(1950, 3, 4).unwrap(),
        "2",
        "000",
    );
    repo.update(&ghost).unwrap();
    assert!(repo.read_by_key(4711).unwrap().is_none());
}

#[test]
fn update_without_identity_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).patients();

    let err = repo.update(&anna_muster()).unwrap_err();
    assert!(matches!(err, RepoError::MissingIdentity(EntityKind::Patient)));
}

#[test]
fn delete_then_read_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).patients();

    let pid = repo.create(&anna_muster()).unwrap();
    repo.delete_by_key(pid).unwrap();

    assert!(repo.read_by_key(pid).unwrap().is_none());
    repo.delete_by_key(pid).unwrap();
}

#[test]
fn read_missing_key_is_none_not_error() {
    let conn = open_db_in_memory().unwrap();
    let factory = RepositoryFactory::new(&conn);

    assert!(factory.patients().read_by_key(1).unwrap().is_none());
    assert!(factory.caregivers().read_by_key(1).unwrap().is_none());
    assert!(factory.treatments().read_by_key(1).unwrap().is_none());
}

#[test]
fn malformed_birth_date_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO patient (pid, firstname, surname, birthdate, carelevel, roomnumber)
         VALUES (1, 'Anna', 'Muster', '01.01.2023', '1', '101');",
        [],
    )
    .unwrap();

    let err = RepositoryFactory::new(&conn)
        .patients()
        .read_by_key(1)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("birthdate")));
}

#[test]
fn caregiver_create_read_update_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).caregivers();

    let cid = repo.create(&max_pfleger()).unwrap();
    let mut loaded = repo.read_by_key(cid).unwrap().unwrap();
    assert_eq!(loaded.cid(), Some(cid));
    assert_eq!(loaded.first_name(), "Max");
    assert_eq!(loaded.surname(), "Pfleger");
    assert_eq!(loaded.phone_number, "0170-1111111");
    assert!(loaded.is_active());

    loaded.phone_number = "0170-2222222".to_string();
    loaded.deactivate();
    repo.update(&loaded).unwrap();

    let reloaded = repo.read_by_key(cid).unwrap().unwrap();
    assert_eq!(reloaded, loaded);
    assert!(!reloaded.is_active());
}

#[test]
fn deactivated_caregiver_stays_in_read_all_but_not_in_active_selection() {
    let conn = open_db_in_memory().unwrap();
    let repo = RepositoryFactory::new(&conn).caregivers();

    let cid = repo.create(&max_pfleger()).unwrap();
    let other = repo
        .create(&Caregiver::new(Person::new("Eva", "Schwester"), "0170-3333333"))
        .unwrap();

    let mut caregiver = repo.read_by_key(cid).unwrap().unwrap();
    caregiver.deactivate();
    repo.update(&caregiver).unwrap();

    let all = repo.read_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|item| item.cid() == Some(cid) && !item.is_active()));

    let active = Caregiver::active_only(&all);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].cid(), Some(other));
}

#[test]
fn invalid_active_flag_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO caregiver (cid, firstname, surname, phonenumber, active)
         VALUES (1, 'Max', 'Pfleger', '0170-1111111', 7);",
    )
    .unwrap();

    let err = RepositoryFactory::new(&conn)
        .caregivers()
        .read_all()
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("active")));
}

fn anna_muster() -> Patient {
    Patient::new(
        Person::new("Anna", "Muster"),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        "1",
        "101",
    )
}

fn max_pfleger() -> Caregiver {
    Caregiver::new(Person::new("Max", "Pfleger"), "0170-1111111")
}
