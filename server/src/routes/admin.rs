//! Admin routes: lead listings, analytics, and inquiry status updates.
//!
//! SYSTEM CONTEXT
//! ==============
//! These endpoints back the admin dashboard. When `ADMIN_TOKEN` is set every
//! handler requires `Authorization: Bearer <token>`; when it is unset they
//! are open and startup logs a warning.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRef, FromRequestParts, Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::Json;
use leads::{
    Analytics, InquiryPage, Problem, SampleRequestPage, StatusUpdate, StatusUpdateResponse, ValidationError,
};
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use super::submissions::{ErrorResponse, bad_request, error_response, lead_error_response};
use crate::services::lead::{self, ListParams};
use crate::state::AppState;

// =============================================================================
// ADMIN EXTRACTOR
// =============================================================================

/// Proof that the request may use admin endpoints.
/// Use as a handler parameter to require the admin token.
pub struct AdminAccess;

impl<S> FromRequestParts<S> for AdminAccess
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Some(expected) = app_state.config.admin_token.as_deref() else {
            return Ok(Self);
        };

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .unwrap_or_default();

        if !presented.is_empty() && tokens_match(presented, expected) {
            return Ok(Self);
        }
        warn!(path = %parts.uri.path(), "admin request rejected");
        Err(error_response(StatusCode::UNAUTHORIZED, "E_UNAUTHORIZED".into(), "admin token required".into(), false))
    }
}

/// Compare digests rather than raw strings so the comparison time does not
/// depend on how long a matching prefix is.
fn tokens_match(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/inquiries?status=&pageSize=&cursor=`: newest-first inquiries.
pub async fn list_inquiries(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Query(params): Query<ListParams>,
) -> Result<Json<InquiryPage>, ErrorResponse> {
    let page = lead::list_inquiries(&state, &params).await.map_err(lead_error_response)?;
    Ok(Json(page))
}

/// `GET /api/sample-requests?pageSize=&cursor=`: newest-first sample requests.
pub async fn list_sample_requests(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Query(params): Query<ListParams>,
) -> Result<Json<SampleRequestPage>, ErrorResponse> {
    let page = lead::list_sample_requests(&state, &params).await.map_err(lead_error_response)?;
    Ok(Json(page))
}

/// `GET /api/analytics`: totals and country breakdown.
pub async fn analytics(State(state): State<AppState>, _admin: AdminAccess) -> Result<Json<Analytics>, ErrorResponse> {
    let analytics = lead::analytics(&state).await.map_err(lead_error_response)?;
    Ok(Json(analytics))
}

/// `PATCH /api/inquiries/{id}/status`: move an inquiry to a new status.
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminAccess,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, ErrorResponse> {
    let Path(id) = id.map_err(|_| lead_error_response(ValidationError::single("id", Problem::Malformed).into()))?;
    let Json(update) = body.map_err(bad_request)?;
    let inquiry = lead::update_status(&state, id, &update).await.map_err(lead_error_response)?;
    Ok(Json(StatusUpdateResponse { success: true, inquiry: Some(inquiry) }))
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
