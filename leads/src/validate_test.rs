use super::*;
use crate::catalog::TeaType;

fn jane_inquiry() -> InquirySubmission {
    InquirySubmission {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        company: "Acme".into(),
        email: "jane@acme.com".into(),
        ..InquirySubmission::default()
    }
}

fn jane_samples(tea_types: &[&str]) -> SampleRequestSubmission {
    SampleRequestSubmission {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        company: "Acme".into(),
        email: "jane@acme.com".into(),
        tea_types: tea_types.iter().map(|t| (*t).to_owned()).collect(),
        ..SampleRequestSubmission::default()
    }
}

// =============================================================================
// inquiry
// =============================================================================

#[test]
fn minimal_inquiry_is_valid() {
    let new = validate_inquiry(&jane_inquiry(), EmailPolicy::Strict).expect("valid");
    assert_eq!(new.first_name, "Jane");
    assert_eq!(new.email, "jane@acme.com");
    assert!(new.phone.is_none());
    assert!(new.country.is_none());
}

#[test]
fn inquiry_reports_every_missing_required_field() {
    let err = validate_inquiry(&InquirySubmission::default(), EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.fields(), vec!["firstName", "lastName", "company", "email"]);
    assert!(err.violations.iter().all(|v| v.problem == Problem::Missing));
    assert_eq!(err.user_message(), "Please fill in all required fields.");
}

#[test]
fn whitespace_only_required_field_counts_as_missing() {
    let sub = InquirySubmission { company: "   ".into(), ..jane_inquiry() };
    let err = validate_inquiry(&sub, EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.fields(), vec!["company"]);
}

#[test]
fn required_fields_are_trimmed() {
    let sub = InquirySubmission { first_name: "  Jane ".into(), ..jane_inquiry() };
    let new = validate_inquiry(&sub, EmailPolicy::Strict).expect("valid");
    assert_eq!(new.first_name, "Jane");
}

#[test]
fn inquiry_parses_catalog_options() {
    let sub = InquirySubmission {
        country: Some("middle-east".into()),
        interest: Some("bulk".into()),
        phone: Some(" +254 700 000000 ".into()),
        message: Some("   ".into()),
        ..jane_inquiry()
    };
    let new = validate_inquiry(&sub, EmailPolicy::Strict).expect("valid");
    assert_eq!(new.country, Some(Region::MiddleEast));
    assert_eq!(new.interest, Some(Interest::Bulk));
    assert_eq!(new.phone.as_deref(), Some("+254 700 000000"));
    assert!(new.message.is_none());
}

#[test]
fn inquiry_rejects_options_outside_catalog() {
    let sub = InquirySubmission {
        country: Some("atlantis".into()),
        interest: Some("gossip".into()),
        ..jane_inquiry()
    };
    let err = validate_inquiry(&sub, EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.fields(), vec!["country", "interest"]);
    assert!(err.violations.iter().all(|v| v.problem == Problem::UnknownOption));
}

#[test]
fn strict_policy_rejects_malformed_email() {
    let sub = InquirySubmission { email: "jane-at-acme".into(), ..jane_inquiry() };
    let err = validate_inquiry(&sub, EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.violations, vec![FieldViolation { field: "email".into(), problem: Problem::Malformed }]);
    assert_eq!(err.user_message(), "Please check the highlighted fields and try again.");
}

#[test]
fn lenient_policy_accepts_any_non_empty_email() {
    let sub = InquirySubmission { email: "jane-at-acme".into(), ..jane_inquiry() };
    assert!(validate_inquiry(&sub, EmailPolicy::Lenient).is_ok());

    let blank = InquirySubmission { email: " ".into(), ..jane_inquiry() };
    assert!(validate_inquiry(&blank, EmailPolicy::Lenient).is_err());
}

// =============================================================================
// sample request
// =============================================================================

#[test]
fn sample_request_without_tea_types_is_rejected() {
    let err = validate_sample_request(&jane_samples(&[]), EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.fields(), vec!["teaTypes"]);
    assert_eq!(err.user_message(), "Please select at least one tea type.");
}

#[test]
fn blank_tea_type_entries_do_not_count() {
    let err = validate_sample_request(&jane_samples(&["", "  "]), EmailPolicy::Strict).unwrap_err();
    assert!(err.has("teaTypes"));
}

#[test]
fn tea_types_are_deduplicated_in_catalog_order() {
    let sub = jane_samples(&["Green Tea - GUNPOWDER", "Black Tea (CTC) - PEKOE", "Green Tea - GUNPOWDER"]);
    let new = validate_sample_request(&sub, EmailPolicy::Strict).expect("valid");
    assert_eq!(new.tea_types, vec![TeaType::CtcPekoe, TeaType::GreenGunpowder]);
}

#[test]
fn unknown_tea_type_is_rejected() {
    let sub = jane_samples(&["Black Tea (CTC) - PEKOE", "Earl Grey"]);
    let err = validate_sample_request(&sub, EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.violations, vec![FieldViolation { field: "teaTypes".into(), problem: Problem::UnknownOption }]);
}

#[test]
fn sample_request_keeps_free_text_country() {
    let sub = SampleRequestSubmission {
        country: Some(" Kenya ".into()),
        quantities: Some("2 x 20ft containers / month".into()),
        ..jane_samples(&["Green Tea - SPECIALTY"])
    };
    let new = validate_sample_request(&sub, EmailPolicy::Strict).expect("valid");
    assert_eq!(new.country.as_deref(), Some("Kenya"));
    assert_eq!(new.quantities.as_deref(), Some("2 x 20ft containers / month"));
    assert!(new.notes.is_none());
}

#[test]
fn missing_contact_and_tea_types_reported_together() {
    let sub = SampleRequestSubmission { first_name: "Jane".into(), ..SampleRequestSubmission::default() };
    let err = validate_sample_request(&sub, EmailPolicy::Strict).unwrap_err();
    assert_eq!(err.fields(), vec!["lastName", "company", "email", "teaTypes"]);
    assert_eq!(err.user_message(), "Please fill in all required fields.");
}

// =============================================================================
// is_valid_email / EmailPolicy
// =============================================================================

#[test]
fn email_shapes() {
    assert!(is_valid_email("jane@acme.com"));
    assert!(is_valid_email("jane.doe+tea@mail.acme.co.ke"));
    assert!(!is_valid_email("jane@acme"));
    assert!(!is_valid_email("@acme.com"));
    assert!(!is_valid_email("jane@@acme.com"));
    assert!(!is_valid_email("jane@acme..com"));
    assert!(!is_valid_email("jane doe@acme.com"));
    assert!(!is_valid_email("jane@-acme.com"));
}

#[test]
fn email_policy_parses_case_insensitively() {
    assert_eq!("STRICT".parse::<EmailPolicy>(), Ok(EmailPolicy::Strict));
    assert_eq!(" lenient ".parse::<EmailPolicy>(), Ok(EmailPolicy::Lenient));
    assert!("loose".parse::<EmailPolicy>().is_err());
    assert_eq!(EmailPolicy::default(), EmailPolicy::Strict);
}

#[test]
fn validation_error_display_lists_fields() {
    let err = ValidationError::single("status", Problem::UnknownOption);
    assert_eq!(err.to_string(), "validation failed: status");
}
