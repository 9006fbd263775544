//! Lead service: intake, admin listing, status updates, analytics.
//!
//! DESIGN
//! ======
//! Public submissions are validated again here with the configured email
//! policy; nothing a browser sends is trusted. Admin reads go straight to the
//! store, and analytics are computed at query time so they always agree with
//! the listings.
//!
//! ERROR HANDLING
//! ==============
//! Every failure funnels into `LeadError`. Query-string problems (unknown
//! status, malformed cursor or page size) are reported as validation errors
//! naming the offending parameter, the same shape a bad form field gets.

use leads::{
    Analytics, FieldViolation, Inquiry, InquiryPage, InquiryStatus, InquirySubmission, Problem, SampleRequest,
    SampleRequestPage, SampleRequestSubmission, StatusUpdate, ValidationError, validate_inquiry,
    validate_sample_request,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PageLimits;
use crate::state::AppState;
use crate::store::{Cursor, InquiryFilter, PageRequest, StoreError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("inquiry not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for LeadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl LeadError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::NotFound(_) => "E_INQUIRY_NOT_FOUND",
            Self::Storage(_) => "E_STORAGE",
        }
    }

    /// Storage failures are transient from the caller's point of view;
    /// resubmitting the same request unchanged never fixes the others.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Query parameters accepted by the admin list endpoints. Kept as raw
/// strings so bad values become field-level validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub status: Option<String>,
    pub page_size: Option<String>,
    pub cursor: Option<String>,
}

// =============================================================================
// INTAKE
// =============================================================================

/// Validate and store a contact-form inquiry.
///
/// # Errors
///
/// [`LeadError::Validation`] listing every rejected field, or
/// [`LeadError::Storage`] if the write fails.
pub async fn submit_inquiry(state: &AppState, submission: &InquirySubmission) -> Result<Inquiry, LeadError> {
    let new = validate_inquiry(submission, state.config.email_policy).inspect_err(|err| {
        warn!(fields = ?err.fields(), "inquiry rejected");
    })?;
    let inquiry = state.store.create_inquiry(new).await?;
    info!(
        inquiry_id = %inquiry.id,
        company = %inquiry.company,
        country = inquiry.country.map(|c| c.as_str()),
        "inquiry created"
    );
    Ok(inquiry)
}

/// Validate and store a sample request.
///
/// # Errors
///
/// Same as [`submit_inquiry`].
pub async fn submit_sample_request(
    state: &AppState,
    submission: &SampleRequestSubmission,
) -> Result<SampleRequest, LeadError> {
    let new = validate_sample_request(submission, state.config.email_policy).inspect_err(|err| {
        warn!(fields = ?err.fields(), "sample request rejected");
    })?;
    let request = state.store.create_sample_request(new).await?;
    info!(
        sample_request_id = %request.id,
        company = %request.company,
        tea_types = request.tea_types.len(),
        "sample request created"
    );
    Ok(request)
}

// =============================================================================
// ADMIN
// =============================================================================

/// One newest-first page of inquiries.
///
/// # Errors
///
/// [`LeadError::Validation`] for an unknown `status`, a malformed `cursor` or
/// a non-numeric `pageSize`; [`LeadError::Storage`] if the read fails.
pub async fn list_inquiries(state: &AppState, params: &ListParams) -> Result<InquiryPage, LeadError> {
    let mut violations = Vec::new();
    let status = match non_blank(params.status.as_deref()) {
        None => None,
        Some(raw) => raw
            .parse::<InquiryStatus>()
            .inspect_err(|_| violations.push(violation("status", Problem::UnknownOption)))
            .ok(),
    };
    let page = page_request(state.config.page_limits, params, &mut violations);
    if !violations.is_empty() {
        return Err(ValidationError { violations }.into());
    }

    let page = state.store.list_inquiries(InquiryFilter { status }, page).await?;
    Ok(InquiryPage { inquiries: page.items, next_cursor: page.next_cursor.map(|c| c.to_string()) })
}

/// One newest-first page of sample requests.
///
/// # Errors
///
/// Same as [`list_inquiries`], minus the status filter.
pub async fn list_sample_requests(state: &AppState, params: &ListParams) -> Result<SampleRequestPage, LeadError> {
    let mut violations = Vec::new();
    let page = page_request(state.config.page_limits, params, &mut violations);
    if !violations.is_empty() {
        return Err(ValidationError { violations }.into());
    }

    let page = state.store.list_sample_requests(page).await?;
    Ok(SampleRequestPage { sample_requests: page.items, next_cursor: page.next_cursor.map(|c| c.to_string()) })
}

/// Move an inquiry to a new status. Any status may follow any other.
///
/// # Errors
///
/// [`LeadError::Validation`] when `status` is not one of the four known
/// values (nothing is written), [`LeadError::NotFound`] for an unknown id.
pub async fn update_status(state: &AppState, id: Uuid, update: &StatusUpdate) -> Result<Inquiry, LeadError> {
    let status: InquiryStatus = update
        .status
        .trim()
        .parse()
        .map_err(|_| ValidationError::single("status", Problem::UnknownOption))?;

    let inquiry = state.store.update_status(id, status).await.inspect_err(|err| {
        if matches!(err, StoreError::NotFound(_)) {
            warn!(inquiry_id = %id, "status update for unknown inquiry");
        }
    })?;
    info!(inquiry_id = %id, status = %status, "inquiry status updated");
    Ok(inquiry)
}

/// Lead totals and country breakdown over every stored record.
///
/// # Errors
///
/// [`LeadError::Storage`] if the read fails.
pub async fn analytics(state: &AppState) -> Result<Analytics, LeadError> {
    Ok(state.store.aggregate().await?)
}

// =============================================================================
// HELPERS
// =============================================================================

fn page_request(limits: PageLimits, params: &ListParams, violations: &mut Vec<FieldViolation>) -> PageRequest {
    let requested = match non_blank(params.page_size.as_deref()) {
        None => None,
        Some(raw) => raw
            .parse::<u32>()
            .inspect_err(|_| violations.push(violation("pageSize", Problem::Malformed)))
            .ok(),
    };
    let cursor = match non_blank(params.cursor.as_deref()) {
        None => None,
        Some(raw) => raw
            .parse::<Cursor>()
            .inspect_err(|_| violations.push(violation("cursor", Problem::Malformed)))
            .ok(),
    };
    PageRequest { size: limits.resolve(requested), cursor }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn violation(field: &str, problem: Problem) -> FieldViolation {
    FieldViolation { field: field.to_owned(), problem }
}

#[cfg(test)]
#[path = "lead_test.rs"]
mod tests;
