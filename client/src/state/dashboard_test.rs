use std::time::Duration;

use leads::LeadStats;

use super::*;
use crate::test_helpers::{FakeApi, inquiry};

fn seeded(count: u128) -> Arc<FakeApi> {
    let api = FakeApi::with_inquiries((1..=count).map(|n| inquiry(n, InquiryStatus::New)).collect());
    *api.analytics.lock().unwrap() = Analytics {
        stats: LeadStats { total_inquiries: 3, total_sample_requests: 1, total_leads: 4 },
        country_breakdown: [("europe".to_owned(), 2)].into_iter().collect(),
    };
    Arc::new(api)
}

fn status_of(dashboard: &Dashboard<FakeApi>, n: u128) -> InquiryStatus {
    let state = dashboard.snapshot();
    state.inquiries.iter().find(|i| i.id == Uuid::from_u128(n)).unwrap().status
}

// =============================================================================
// LOADING
// =============================================================================

#[tokio::test]
async fn new_dashboard_starts_loading() {
    let dashboard = Dashboard::new(seeded(1));
    assert_eq!(dashboard.snapshot().phase, LoadPhase::Loading);
}

#[tokio::test]
async fn load_applies_both_results() {
    let dashboard = Dashboard::new(seeded(3));

    assert_eq!(dashboard.load().await, RefreshOutcome::Finished(LoadPhase::Ready));
    let state = dashboard.snapshot();
    assert_eq!(state.inquiries.len(), 3);
    assert_eq!(state.analytics.unwrap().stats.total_leads, 4);
    assert_eq!(state.banner, None);
}

#[tokio::test]
async fn failed_analytics_keeps_the_inquiry_list() {
    let api = seeded(2);
    api.fail_analytics.store(true, Ordering::SeqCst);
    let dashboard = Dashboard::new(Arc::clone(&api));

    assert_eq!(dashboard.load().await, RefreshOutcome::Finished(LoadPhase::Error));
    let state = dashboard.snapshot();
    assert_eq!(state.inquiries.len(), 2);
    assert_eq!(state.analytics, None);
    assert_eq!(state.banner, Some(Banner { message: LOAD_FAILURE.to_owned(), retryable: true }));
}

#[tokio::test]
async fn failed_refresh_keeps_earlier_data_and_recovers() {
    let api = seeded(2);
    let dashboard = Dashboard::new(Arc::clone(&api));
    dashboard.load().await;

    api.fail_inquiries.store(true, Ordering::SeqCst);
    assert_eq!(dashboard.refresh().await, RefreshOutcome::Finished(LoadPhase::Error));
    let state = dashboard.snapshot();
    assert_eq!(state.inquiries.len(), 2);
    assert!(state.analytics.is_some());
    assert!(state.banner.is_some());

    api.fail_inquiries.store(false, Ordering::SeqCst);
    assert_eq!(dashboard.refresh().await, RefreshOutcome::Finished(LoadPhase::Ready));
    assert_eq!(dashboard.snapshot().banner, None);
}

#[tokio::test(start_paused = true)]
async fn overlapping_refreshes_are_deduplicated() {
    let api = seeded(2);
    api.set_delay(Duration::from_millis(500));
    let dashboard = Dashboard::new(Arc::clone(&api));

    let (first, second) = tokio::join!(dashboard.load(), dashboard.refresh());
    assert_eq!(first, RefreshOutcome::Finished(LoadPhase::Ready));
    assert_eq!(second, RefreshOutcome::AlreadyInFlight);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

    // The flag is released once the first load finishes.
    assert_eq!(dashboard.refresh().await, RefreshOutcome::Finished(LoadPhase::Ready));
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn filter_change_during_a_load_is_refused() {
    let api = Arc::new(FakeApi::with_inquiries(vec![inquiry(1, InquiryStatus::New), inquiry(2, InquiryStatus::Closed)]));
    api.set_delay(Duration::from_millis(500));
    let dashboard = Dashboard::new(Arc::clone(&api));

    let (first, second) = tokio::join!(dashboard.load(), dashboard.set_filter(Some(InquiryStatus::Closed)));
    assert_eq!(first, RefreshOutcome::Finished(LoadPhase::Ready));
    assert_eq!(second, RefreshOutcome::AlreadyInFlight);

    // The filter still describes the rows on screen.
    let state = dashboard.snapshot();
    assert_eq!(state.status_filter, None);
    assert_eq!(state.inquiries.len(), 2);

    assert_eq!(dashboard.set_filter(Some(InquiryStatus::Closed)).await, RefreshOutcome::Finished(LoadPhase::Ready));
    let state = dashboard.snapshot();
    assert_eq!(state.status_filter, Some(InquiryStatus::Closed));
    assert!(state.inquiries.iter().all(|i| i.status == InquiryStatus::Closed));
}

#[tokio::test]
async fn filter_reloads_matching_inquiries() {
    let api = Arc::new(FakeApi::with_inquiries(vec![
        inquiry(1, InquiryStatus::New),
        inquiry(2, InquiryStatus::Closed),
        inquiry(3, InquiryStatus::Closed),
    ]));
    let dashboard = Dashboard::new(api);

    dashboard.set_filter(Some(InquiryStatus::Closed)).await;
    let state = dashboard.snapshot();
    assert_eq!(state.status_filter, Some(InquiryStatus::Closed));
    assert_eq!(state.inquiries.len(), 2);
    assert!(state.inquiries.iter().all(|i| i.status == InquiryStatus::Closed));
}

#[tokio::test]
async fn load_more_walks_every_page() {
    let dashboard = Dashboard::new(seeded(5)).with_page_size(2);

    dashboard.load().await;
    assert_eq!(dashboard.snapshot().inquiries.len(), 2);
    assert_eq!(dashboard.snapshot().next_cursor.as_deref(), Some("2"));

    dashboard.load_more().await;
    dashboard.load_more().await;
    let state = dashboard.snapshot();
    assert_eq!(state.inquiries.len(), 5);
    assert_eq!(state.next_cursor, None);

    assert_eq!(dashboard.load_more().await, RefreshOutcome::Exhausted);
}

#[tokio::test(start_paused = true)]
async fn load_after_teardown_is_dropped() {
    let api = seeded(2);
    api.set_delay(Duration::from_secs(1));
    let dashboard = Dashboard::new(api);

    let (outcome, ()) = tokio::join!(dashboard.load(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        dashboard.teardown();
    });

    assert_eq!(outcome, RefreshOutcome::Dropped);
    let state = dashboard.snapshot();
    assert_eq!(state.phase, LoadPhase::Loading);
    assert!(state.inquiries.is_empty());
}

// =============================================================================
// STATUS UPDATES
// =============================================================================

#[tokio::test]
async fn successful_update_takes_the_server_record() {
    let api = seeded(2);
    let dashboard = Dashboard::new(Arc::clone(&api));
    dashboard.load().await;
    let before = dashboard.snapshot().inquiries[0].clone();

    let server = dashboard.update_status(before.id, InquiryStatus::Closed).await.unwrap();

    assert_eq!(server.status, InquiryStatus::Closed);
    assert!(server.updated_at > before.updated_at);
    let row = dashboard.snapshot().inquiries[0].clone();
    assert_eq!(row, server);
}

#[tokio::test(start_paused = true)]
async fn update_is_visible_before_the_server_answers() {
    let api = seeded(1);
    let dashboard = Dashboard::new(Arc::clone(&api));
    dashboard.load().await;
    api.set_delay(Duration::from_secs(1));

    let (result, seen) = tokio::join!(dashboard.update_status(Uuid::from_u128(1), InquiryStatus::Contacted), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        status_of(&dashboard, 1)
    });

    assert_eq!(seen, InquiryStatus::Contacted);
    assert_eq!(result.unwrap().status, InquiryStatus::Contacted);
}

#[tokio::test]
async fn failed_update_reverts_and_shows_banner() {
    let api = seeded(1);
    let dashboard = Dashboard::new(Arc::clone(&api));
    dashboard.load().await;
    let before = dashboard.snapshot().inquiries[0].clone();
    api.fail_updates.store(true, Ordering::SeqCst);

    let err = dashboard.update_status(before.id, InquiryStatus::Quoted).await.unwrap_err();

    assert!(matches!(err, DashboardError::UpdateFailed(_)), "{err:?}");
    let state = dashboard.snapshot();
    assert_eq!(state.inquiries[0], before);
    assert_eq!(state.banner, Some(Banner { message: UPDATE_FAILURE.to_owned(), retryable: true }));
    assert_eq!(api.updates.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_update_does_not_clobber_a_newer_row() {
    let api = seeded(1);
    let dashboard = Dashboard::new(Arc::clone(&api));
    dashboard.load().await;
    api.fail_updates.store(true, Ordering::SeqCst);
    api.set_delay(Duration::from_secs(1));

    let (result, ()) = tokio::join!(dashboard.update_status(Uuid::from_u128(1), InquiryStatus::Quoted), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        // Someone else moved it to contacted; a reload picks that up.
        api.inquiries.lock().unwrap()[0].status = InquiryStatus::Contacted;
        api.set_delay(Duration::ZERO);
        dashboard.refresh().await;
    });

    assert!(result.is_err());
    assert_eq!(status_of(&dashboard, 1), InquiryStatus::Contacted);
}

#[tokio::test]
async fn unknown_inquiry_is_rejected_locally() {
    let api = seeded(1);
    let dashboard = Dashboard::new(Arc::clone(&api));
    dashboard.load().await;

    let err = dashboard.update_status(Uuid::from_u128(99), InquiryStatus::Closed).await.unwrap_err();

    assert!(matches!(err, DashboardError::UnknownInquiry(id) if id == Uuid::from_u128(99)));
    assert_eq!(api.updates.load(Ordering::SeqCst), 0);
}

#[test]
fn badge_classes_follow_status() {
    assert_eq!(badge_class("new"), "bg-blue-100 text-blue-800");
    assert_eq!(badge_class("contacted"), "bg-yellow-100 text-yellow-800");
    assert_eq!(badge_class("quoted"), "bg-purple-100 text-purple-800");
    assert_eq!(badge_class("closed"), "bg-green-100 text-green-800");
    assert_eq!(badge_class("archived"), "bg-gray-100 text-gray-800");
}
