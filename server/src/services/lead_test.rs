use super::*;
use crate::state::test_helpers;
use leads::{EmailPolicy, Region, TeaType};

fn jane() -> InquirySubmission {
    InquirySubmission {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        company: "Acme".into(),
        email: "jane@acme.com".into(),
        ..InquirySubmission::default()
    }
}

fn sample_request(tea_types: &[&str]) -> SampleRequestSubmission {
    SampleRequestSubmission {
        first_name: "Omar".into(),
        last_name: "Haddad".into(),
        company: "Gulf Traders".into(),
        email: "omar@gulf.example".into(),
        country: Some("UAE".into()),
        tea_types: tea_types.iter().map(|t| (*t).to_owned()).collect(),
        ..SampleRequestSubmission::default()
    }
}

fn params(status: Option<&str>, page_size: Option<&str>, cursor: Option<&str>) -> ListParams {
    ListParams {
        status: status.map(str::to_owned),
        page_size: page_size.map(str::to_owned),
        cursor: cursor.map(str::to_owned),
    }
}

#[tokio::test]
async fn jane_doe_inquiry_is_created_as_new() {
    let state = test_helpers::test_app_state();
    let inquiry = submit_inquiry(&state, &jane()).await.expect("submit");

    assert_eq!(inquiry.status, InquiryStatus::New);
    assert_eq!(inquiry.created_at, inquiry.updated_at);
    assert_eq!(inquiry.full_name(), "Jane Doe");

    let page = list_inquiries(&state, &ListParams::default()).await.expect("list");
    assert_eq!(page.inquiries, vec![inquiry]);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn invalid_inquiry_is_rejected_and_not_stored() {
    let state = test_helpers::test_app_state();
    let submission = InquirySubmission { email: "not-an-email".into(), company: "  ".into(), ..jane() };

    let err = submit_inquiry(&state, &submission).await.unwrap_err();
    let LeadError::Validation(err) = &err else { panic!("expected validation error, got {err:?}") };
    assert_eq!(err.fields(), vec!["company", "email"]);

    let analytics = analytics(&state).await.expect("analytics");
    assert_eq!(analytics.stats.total_inquiries, 0);
}

#[tokio::test]
async fn lenient_policy_accepts_odd_email() {
    let mut state = test_helpers::test_app_state();
    let mut config = (*state.config).clone();
    config.email_policy = EmailPolicy::Lenient;
    state.config = std::sync::Arc::new(config);

    let submission = InquirySubmission { email: "jane at acme".into(), ..jane() };
    assert!(submit_inquiry(&state, &submission).await.is_ok());
}

#[tokio::test]
async fn sample_request_without_tea_types_creates_nothing() {
    let state = test_helpers::test_app_state();
    let err = submit_sample_request(&state, &sample_request(&[])).await.unwrap_err();
    assert!(matches!(&err, LeadError::Validation(v) if v.has("teaTypes")));

    let page = list_sample_requests(&state, &ListParams::default()).await.expect("list");
    assert!(page.sample_requests.is_empty());
}

#[tokio::test]
async fn sample_request_keeps_selected_tea_types() {
    let state = test_helpers::test_app_state();
    let created = submit_sample_request(&state, &sample_request(&["Green Tea - SENCHA STYLE", "Black Tea (CTC) - PEKOE"]))
        .await
        .expect("submit");
    assert_eq!(created.tea_types, vec![TeaType::CtcPekoe, TeaType::GreenSencha]);
    assert_eq!(created.country.as_deref(), Some("UAE"));
}

#[tokio::test]
async fn list_filters_by_status_and_rejects_unknown_status() {
    let state = test_helpers::test_app_state();
    let a = submit_inquiry(&state, &jane()).await.unwrap();
    submit_inquiry(&state, &jane()).await.unwrap();
    update_status(&state, a.id, &StatusUpdate { status: "contacted".into() }).await.unwrap();

    let page = list_inquiries(&state, &params(Some("contacted"), None, None)).await.unwrap();
    assert_eq!(page.inquiries.len(), 1);
    assert_eq!(page.inquiries[0].id, a.id);

    let err = list_inquiries(&state, &params(Some("archived"), None, None)).await.unwrap_err();
    assert!(matches!(&err, LeadError::Validation(v) if v.has("status")));
    assert_eq!(err.error_code(), "E_VALIDATION");
}

#[tokio::test]
async fn bad_paging_parameters_are_all_reported() {
    let state = test_helpers::test_app_state();
    let err = list_inquiries(&state, &params(None, Some("ten"), Some("garbage"))).await.unwrap_err();
    let LeadError::Validation(err) = err else { panic!("expected validation error") };
    assert_eq!(err.fields(), vec!["pageSize", "cursor"]);
}

#[tokio::test]
async fn page_cursor_walks_to_the_end() {
    let state = test_helpers::test_app_state();
    for _ in 0..5 {
        submit_inquiry(&state, &jane()).await.unwrap();
    }

    let first = list_inquiries(&state, &params(None, Some("3"), None)).await.unwrap();
    assert_eq!(first.inquiries.len(), 3);
    let cursor = first.next_cursor.expect("more pages");

    let second = list_inquiries(&state, &params(None, Some("3"), Some(&cursor))).await.unwrap();
    assert_eq!(second.inquiries.len(), 2);
    assert!(second.next_cursor.is_none());
}

#[tokio::test]
async fn zero_page_size_is_clamped_to_one() {
    let state = test_helpers::test_app_state();
    submit_inquiry(&state, &jane()).await.unwrap();
    submit_inquiry(&state, &jane()).await.unwrap();

    let page = list_inquiries(&state, &params(None, Some("0"), None)).await.unwrap();
    assert_eq!(page.inquiries.len(), 1);
    assert!(page.next_cursor.is_some());
}

#[tokio::test]
async fn update_status_rejects_unknown_value_without_writing() {
    let state = test_helpers::test_app_state();
    let created = submit_inquiry(&state, &jane()).await.unwrap();

    let err = update_status(&state, created.id, &StatusUpdate { status: "archived".into() }).await.unwrap_err();
    assert!(matches!(&err, LeadError::Validation(v) if v.has("status")));

    let page = list_inquiries(&state, &ListParams::default()).await.unwrap();
    assert_eq!(page.inquiries, vec![created]);
}

#[tokio::test]
async fn update_status_on_unknown_id_is_not_found() {
    let state = test_helpers::test_app_state();
    let missing = Uuid::new_v4();
    let err = update_status(&state, missing, &StatusUpdate { status: "closed".into() }).await.unwrap_err();
    assert!(matches!(err, LeadError::NotFound(id) if id == missing));
    assert_eq!(err.error_code(), "E_INQUIRY_NOT_FOUND");
    assert!(!err.retryable());
}

#[tokio::test]
async fn analytics_count_both_kinds() {
    let state = test_helpers::test_app_state();
    let submission = InquirySubmission { country: Some(Region::Asia.as_str().into()), ..jane() };
    submit_inquiry(&state, &submission).await.unwrap();
    submit_sample_request(&state, &sample_request(&["Black Tea (CTC) - PEKOE"])).await.unwrap();

    let analytics = analytics(&state).await.unwrap();
    assert_eq!(analytics.stats.total_leads, 2);
    assert_eq!(analytics.country_breakdown.get("asia"), Some(&1));
    assert_eq!(analytics.country_breakdown.get("uae"), Some(&1));
}

#[tokio::test]
async fn storage_failures_are_retryable() {
    let state = test_helpers::failing_app_state();
    let err = submit_inquiry(&state, &jane()).await.unwrap_err();
    assert!(matches!(err, LeadError::Storage(_)));
    assert_eq!(err.error_code(), "E_STORAGE");
    assert!(err.retryable());
}
