//! Public submission routes and the shared error-to-response mapping.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use leads::{ErrorBody, ErrorDetail, Inquiry, InquirySubmission, SampleRequest, SampleRequestSubmission};
use tracing::{error, warn};

use crate::services::lead::{self, LeadError};
use crate::state::AppState;

/// Error half of every JSON handler's result.
pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

const GENERIC_FAILURE: &str = "Something went wrong. Please try again or contact us directly.";

/// `POST /api/inquiries`: validate and store a contact-form inquiry.
pub async fn create_inquiry(
    State(state): State<AppState>,
    body: Result<Json<InquirySubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Inquiry>), ErrorResponse> {
    let Json(submission) = body.map_err(bad_request)?;
    let inquiry = lead::submit_inquiry(&state, &submission).await.map_err(lead_error_response)?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// `POST /api/sample-requests`: validate and store a sample request.
pub async fn create_sample_request(
    State(state): State<AppState>,
    body: Result<Json<SampleRequestSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SampleRequest>), ErrorResponse> {
    let Json(submission) = body.map_err(bad_request)?;
    let request = lead::submit_sample_request(&state, &submission)
        .await
        .map_err(lead_error_response)?;
    Ok((StatusCode::CREATED, Json(request)))
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

pub(crate) fn lead_error_response(err: LeadError) -> ErrorResponse {
    let code = err.error_code().to_owned();
    let retryable = err.retryable();
    match err {
        LeadError::Validation(v) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: ErrorDetail { code, message: v.user_message().to_owned(), retryable, fields: v.violations },
            }),
        ),
        LeadError::NotFound(id) => error_response(StatusCode::NOT_FOUND, code, format!("inquiry {id} not found"), retryable),
        LeadError::Storage(e) => {
            error!(error = %e, "lead storage failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, code, GENERIC_FAILURE.to_owned(), retryable)
        }
    }
}

pub(crate) fn bad_request(rejection: JsonRejection) -> ErrorResponse {
    warn!(error = %rejection.body_text(), "unreadable request body");
    error_response(StatusCode::BAD_REQUEST, "E_BAD_REQUEST".into(), rejection.body_text(), false)
}

pub(crate) fn error_response(status: StatusCode, code: String, message: String, retryable: bool) -> ErrorResponse {
    (status, Json(ErrorBody { error: ErrorDetail { code, message, retryable, fields: Vec::new() } }))
}

#[cfg(test)]
#[path = "submissions_test.rs"]
mod tests;
