use chrono::{NaiveDate, NaiveTime};
use nhplus_core::db::open_db_in_memory;
use nhplus_core::{
    CareService, Caregiver, CaregiverId, NewTreatment, Patient, PatientId, Person, RepoError,
    Repository, RepositoryFactory, ServiceError,
};
use rusqlite::Connection;

#[test]
fn record_treatment_returns_stored_treatment_with_caregiver_fields() {
    let conn = open_db_in_memory().unwrap();
    let (pid, cid) = seed(&conn);
    let service = CareService::new(RepositoryFactory::new(&conn));

    let treatment = service.record_treatment(&request(pid, cid)).unwrap();

    assert!(treatment.tid().is_some());
    assert_eq!(treatment.begin_text(), "09:00");
    assert_eq!(treatment.end_text(), "09:30");
    assert_eq!(treatment.duration().num_minutes(), 30);
    let caregiver = treatment.caregiver().unwrap();
    assert_eq!(caregiver.surname, "Pfleger");
    assert_eq!(caregiver.first_name, "Max");
}

#[test]
fn record_treatment_rejects_inactive_caregiver() {
    let conn = open_db_in_memory().unwrap();
    let (pid, cid) = seed(&conn);
    let repos = RepositoryFactory::new(&conn);
    let mut caregiver = repos.caregivers().read_by_key(cid).unwrap().unwrap();
    caregiver.deactivate();
    repos.caregivers().update(&caregiver).unwrap();

    let service = CareService::new(repos);
    let err = service.record_treatment(&request(pid, cid)).unwrap_err();
    assert!(matches!(err, ServiceError::CaregiverInactive(id) if id == cid));
    assert!(service.treatments(None).unwrap().is_empty());
}

#[test]
fn record_treatment_reports_unknown_references() {
    let conn = open_db_in_memory().unwrap();
    let (pid, cid) = seed(&conn);
    let service = CareService::new(RepositoryFactory::new(&conn));

    let err = service
        .record_treatment(&request(pid + 100, cid))
        .unwrap_err();
    assert!(matches!(err, ServiceError::PatientNotFound(_)));

    let err = service
        .record_treatment(&request(pid, cid + 100))
        .unwrap_err();
    assert!(matches!(err, ServiceError::CaregiverNotFound(_)));
}

#[test]
fn record_treatment_surfaces_validation_errors() {
    let conn = open_db_in_memory().unwrap();
    let (pid, cid) = seed(&conn);
    let service = CareService::new(RepositoryFactory::new(&conn));

    let mut blank = request(pid, cid);
    blank.description = "   ".to_string();
    let err = service.record_treatment(&blank).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::Validation(_))));
}

#[test]
fn assignable_caregivers_lists_active_only() {
    let conn = open_db_in_memory().unwrap();
    let (_, cid) = seed(&conn);
    let repos = RepositoryFactory::new(&conn);
    let mut inactive = Caregiver::new(Person::new("Eva", "Abwesend"), "0170-4444444");
    inactive.deactivate();
    repos.caregivers().create(&inactive).unwrap();

    let service = CareService::new(repos);
    let assignable = service.assignable_caregivers().unwrap();
    assert_eq!(assignable.len(), 1);
    assert_eq!(assignable[0].cid(), Some(cid));
}

#[test]
fn treatments_filter_by_patient_and_remove() {
    let conn = open_db_in_memory().unwrap();
    let (pid, cid) = seed(&conn);
    let other_pid = RepositoryFactory::new(&conn)
        .patients()
        .create(&Patient::new(
            Person::new("Bernd", "Beispiel"),
            NaiveDate::from_ymd_opt(1940, 7, 9).unwrap(),
            "2",
            "102",
        ))
        .unwrap();
    let service = CareService::new(RepositoryFactory::new(&conn));

    let kept = service.record_treatment(&request(pid, cid)).unwrap();
    let removed = service.record_treatment(&request(other_pid, cid)).unwrap();

    assert_eq!(service.treatments(None).unwrap().len(), 2);
    assert_eq!(service.treatments(Some(pid)).unwrap(), vec![kept.clone()]);

    service.remove_treatment(removed.tid().unwrap()).unwrap();
    assert_eq!(service.treatments(None).unwrap(), vec![kept]);
}

fn seed(conn: &Connection) -> (PatientId, CaregiverId) {
    let repos = RepositoryFactory::new(conn);
    let pid = repos
        .patients()
        .create(&Patient::new(
            Person::new("Anna", "Muster"),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            "1",
            "101",
        ))
        .unwrap();
    let cid = repos
        .caregivers()
        .create(&Caregiver::new(
            Person::new("Max", "Pfleger"),
            "0170-1111111",
        ))
        .unwrap();
    (pid, cid)
}

fn request(pid: PatientId, cid: CaregiverId) -> NewTreatment {
    NewTreatment {
        pid,
        cid,
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        begin: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        description: "Verbandswechsel".to_string(),
        remarks: String::new(),
    }
}
