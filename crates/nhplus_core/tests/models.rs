use chrono::{NaiveDate, NaiveTime};
use nhplus_core::{
    Caregiver, CaregiverDisplay, Patient, Person, Treatment, TreatmentValidationError,
};

#[test]
fn pre_persistence_constructors_have_no_identity() {
    let patient = Patient::new(
        Person::new("Anna", "Muster"),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        "1",
        "101",
    );
    let caregiver = Caregiver::new(Person::new("Max", "Pfleger"), "0170-1111111");
    let treatment = sample_treatment();

    assert_eq!(patient.pid(), None);
    assert_eq!(caregiver.cid(), None);
    assert_eq!(treatment.tid(), None);
    assert!(treatment.caregiver().is_none());
    assert_eq!(patient.person.full_name(), "Muster, Anna");
}

#[test]
fn validate_rejects_end_not_after_begin() {
    let mut treatment = sample_treatment();
    assert!(treatment.validate().is_ok());

    treatment.end = treatment.begin;
    let err = treatment.validate().unwrap_err();
    assert_eq!(
        err,
        TreatmentValidationError::EndNotAfterBegin {
            begin: treatment.begin,
            end: treatment.end,
        }
    );
    assert_eq!(
        err.to_string(),
        "treatment end 09:00 must be later than begin 09:00"
    );
}

#[test]
fn validate_rejects_blank_description() {
    let mut treatment = sample_treatment();
    treatment.description = "\t ".to_string();
    assert_eq!(
        treatment.validate().unwrap_err(),
        TreatmentValidationError::BlankDescription
    );
}

#[test]
fn patient_serialization_flattens_person_fields() {
    let patient = Patient::with_id(
        3,
        Person::new("Anna", "Muster"),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        "1",
        "101",
    );

    let json = serde_json::to_value(&patient).unwrap();
    assert_eq!(json["pid"], 3);
    assert_eq!(json["first_name"], "Anna");
    assert_eq!(json["surname"], "Muster");
    assert_eq!(json["birth_date"], "2023-01-01");

    let decoded: Patient = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, patient);
}

#[test]
fn treatment_times_use_persisted_text_shape() {
    let treatment = sample_treatment();

    let json = serde_json::to_value(&treatment).unwrap();
    assert_eq!(json["date"], "2024-05-01");
    assert_eq!(json["begin"], "09:00");
    assert_eq!(json["end"], "09:30");
    assert!(json["caregiver"].is_null());
}

#[test]
fn caregiver_projection_cannot_be_injected_by_deserialization() {
    let json = serde_json::json!({
        "tid": 9,
        "pid": 1,
        "cid": 2,
        "date": "2024-05-01",
        "begin": "09:00",
        "end": "09:30",
        "description": "Verbandswechsel",
        "remarks": "",
        "caregiver": {
            "surname": "Falsch",
            "first_name": "Fritz",
            "phone_number": "000"
        }
    });

    let decoded: Treatment = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.tid(), Some(9));
    assert!(decoded.caregiver().is_none());
}

#[test]
fn unresolved_display_is_recognisable() {
    assert!(CaregiverDisplay::unresolved().is_unresolved());

    let caregiver = Caregiver::with_id(1, Person::new("Max", "Pfleger"), "0170-1111111", false);
    let display = CaregiverDisplay::from(&caregiver);
    assert!(!display.is_unresolved());
    assert_eq!(display.surname, "Pfleger");
}

fn sample_treatment() -> Treatment {
    Treatment::new(
        1,
        2,
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        "Verbandswechsel",
        "",
    )
}
