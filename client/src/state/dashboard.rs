//! Admin dashboard state: inquiry list, analytics, and status updates.
//!
//! DESIGN
//! ======
//! A load fires the inquiry-list and analytics requests together and applies
//! whichever of them succeeded. Both must succeed for `Ready`; otherwise the
//! dashboard is in `Error` with a retryable banner and keeps every piece of
//! data it already had.
//!
//! Status changes are optimistic. The local row flips immediately; the server
//! copy replaces it on success, and on failure the row is reverted unless
//! something newer has written to it since.
//!
//! SYSTEM CONTEXT
//! ==============
//! State sits behind a std mutex that is only taken between awaits. A single
//! atomic flag de-duplicates overlapping loads, and a `Liveness` flag drops
//! replies that land after teardown.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use leads::{Analytics, Inquiry, InquiryStatus};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::net::api::{ApiError, LeadApi, PageQuery};
use crate::util::liveness::Liveness;
use crate::util::lock;

pub const LOAD_FAILURE: &str = "Failed to load data. Please refresh the page.";
pub const UPDATE_FAILURE: &str = "Failed to update status. Please try again.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub retryable: bool,
}

impl Banner {
    fn new(message: &str, retryable: bool) -> Self {
        Self { message: message.to_owned(), retryable }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub phase: LoadPhase,
    pub inquiries: Vec<Inquiry>,
    /// Cursor for the next page of inquiries, if the server has more.
    pub next_cursor: Option<String>,
    pub analytics: Option<Analytics>,
    pub banner: Option<Banner>,
    pub status_filter: Option<InquiryStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Finished(LoadPhase),
    /// Another load was running; this call did nothing.
    AlreadyInFlight,
    /// Nothing further to fetch.
    Exhausted,
    /// The dashboard was torn down before the replies arrived.
    Dropped,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("inquiry {0} is not on the dashboard")]
    UnknownInquiry(Uuid),
    #[error("status update failed: {0}")]
    UpdateFailed(#[from] ApiError),
    #[error("dashboard was torn down")]
    TornDown,
}

/// Tailwind classes for a status badge. Anything unrecognized gets grey.
#[must_use]
pub fn badge_class(status: &str) -> &'static str {
    match status.parse::<InquiryStatus>() {
        Ok(InquiryStatus::New) => "bg-blue-100 text-blue-800",
        Ok(InquiryStatus::Contacted) => "bg-yellow-100 text-yellow-800",
        Ok(InquiryStatus::Quoted) => "bg-purple-100 text-purple-800",
        Ok(InquiryStatus::Closed) => "bg-green-100 text-green-800",
        Err(_) => "bg-gray-100 text-gray-800",
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

pub struct Dashboard<A: ?Sized> {
    api: Arc<A>,
    state: Mutex<DashboardState>,
    loading: AtomicBool,
    liveness: Liveness,
    page_size: Option<u32>,
}

/// Clears the in-flight flag however the load ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: LeadApi + ?Sized> Dashboard<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(DashboardState::default()),
            loading: AtomicBool::new(false),
            liveness: Liveness::new(),
            page_size: None,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardState {
        lock(&self.state).clone()
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        if self.loading.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(InFlight(&self.loading))
    }

    /// Fetch the first inquiry page and the analytics together.
    pub async fn load(&self) -> RefreshOutcome {
        let Some(in_flight) = self.begin() else {
            return RefreshOutcome::AlreadyInFlight;
        };
        self.reload(in_flight).await
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.load().await
    }

    /// Change the status filter and reload from the first page. While another
    /// load is running the filter is left unchanged.
    pub async fn set_filter(&self, status: Option<InquiryStatus>) -> RefreshOutcome {
        let Some(in_flight) = self.begin() else {
            return RefreshOutcome::AlreadyInFlight;
        };
        lock(&self.state).status_filter = status;
        self.reload(in_flight).await
    }

    async fn reload(&self, _in_flight: InFlight<'_>) -> RefreshOutcome {
        let filter = {
            let mut state = lock(&self.state);
            state.phase = LoadPhase::Loading;
            state.status_filter
        };

        let page = PageQuery { page_size: self.page_size, cursor: None };
        let (inquiries, analytics) = tokio::join!(self.api.get_inquiries(filter, &page), self.api.get_analytics());
        if !self.liveness.is_alive() {
            return RefreshOutcome::Dropped;
        }

        let mut state = lock(&self.state);
        let mut failed = false;
        match inquiries {
            Ok(page) => {
                state.inquiries = page.inquiries;
                state.next_cursor = page.next_cursor;
            }
            Err(err) => {
                warn!(error = %err, "inquiry list failed to load");
                failed = true;
            }
        }
        match analytics {
            Ok(analytics) => state.analytics = Some(analytics),
            Err(err) => {
                warn!(error = %err, "analytics failed to load");
                failed = true;
            }
        }

        if failed {
            state.phase = LoadPhase::Error;
            state.banner = Some(Banner::new(LOAD_FAILURE, true));
        } else {
            state.phase = LoadPhase::Ready;
            state.banner = None;
        }
        RefreshOutcome::Finished(state.phase)
    }

    /// Append the next page of inquiries, if there is one.
    pub async fn load_more(&self) -> RefreshOutcome {
        let Some(_in_flight) = self.begin() else {
            return RefreshOutcome::AlreadyInFlight;
        };
        let (filter, cursor) = {
            let state = lock(&self.state);
            (state.status_filter, state.next_cursor.clone())
        };
        let Some(cursor) = cursor else {
            return RefreshOutcome::Exhausted;
        };

        let page = PageQuery { page_size: self.page_size, cursor: Some(cursor) };
        let result = self.api.get_inquiries(filter, &page).await;
        if !self.liveness.is_alive() {
            return RefreshOutcome::Dropped;
        }

        let mut state = lock(&self.state);
        match result {
            Ok(page) => {
                state.inquiries.extend(page.inquiries);
                state.next_cursor = page.next_cursor;
            }
            Err(err) => {
                warn!(error = %err, "next inquiry page failed to load");
                state.phase = LoadPhase::Error;
                state.banner = Some(Banner::new(LOAD_FAILURE, true));
            }
        }
        RefreshOutcome::Finished(state.phase)
    }

    /// Optimistically set `status` on a listed inquiry, then confirm with the
    /// server.
    ///
    /// # Errors
    ///
    /// [`DashboardError::UnknownInquiry`] without a network call when `id` is
    /// not listed; [`DashboardError::UpdateFailed`] after reverting the row
    /// when the server call fails; [`DashboardError::TornDown`] when the
    /// reply arrived after teardown.
    pub async fn update_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, DashboardError> {
        let (previous, optimistic) = {
            let mut state = lock(&self.state);
            let Some(row) = state.inquiries.iter_mut().find(|i| i.id == id) else {
                return Err(DashboardError::UnknownInquiry(id));
            };
            let previous = row.clone();
            row.status = status;
            row.updated_at = OffsetDateTime::now_utc().max(previous.updated_at);
            (previous, row.clone())
        };

        let result = self.api.update_inquiry_status(id, status).await;
        if !self.liveness.is_alive() {
            return Err(DashboardError::TornDown);
        }

        let mut state = lock(&self.state);
        match result {
            Ok(server) => {
                if let Some(row) = state.inquiries.iter_mut().find(|i| i.id == id) {
                    *row = server.clone();
                }
                info!(inquiry_id = %id, status = status.as_str(), "inquiry status updated");
                Ok(server)
            }
            Err(err) => {
                if let Some(row) = state.inquiries.iter_mut().find(|i| i.id == id) {
                    if *row == optimistic {
                        *row = previous;
                    }
                }
                warn!(inquiry_id = %id, error = %err, "inquiry status update failed");
                state.banner = Some(Banner::new(UPDATE_FAILURE, true));
                Err(err.into())
            }
        }
    }

    /// Stop applying replies. Requests already sent are not cancelled.
    pub fn teardown(&self) {
        self.liveness.kill();
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;
