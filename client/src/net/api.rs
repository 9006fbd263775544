//! REST API client for the lead server.
//!
//! `LeadApi` is the seam the submission client and dashboard depend on;
//! `HttpLeadApi` implements it over `reqwest`, and tests swap in a fake.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx replies become `ApiError::Status` carrying the server's JSON error
//! envelope when one could be decoded, so callers can show the server's
//! message and field list instead of a bare status code.

use async_trait::async_trait;
use leads::{
    Analytics, ErrorBody, Inquiry, InquiryPage, InquiryStatus, InquirySubmission, SampleRequest, SampleRequestPage,
    SampleRequestSubmission, StatusUpdate, StatusUpdateResponse,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}")]
    Status { status: u16, body: Option<ErrorBody> },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    /// The server's own message, when it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { body: Some(body), .. } => Some(body.error.message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Paging for the admin list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page_size: Option<u32>,
    pub cursor: Option<String>,
}

/// Remote operations the site and dashboard need.
#[async_trait]
pub trait LeadApi: Send + Sync {
    async fn create_inquiry(&self, submission: &InquirySubmission) -> Result<Inquiry, ApiError>;

    async fn create_sample_request(&self, submission: &SampleRequestSubmission) -> Result<SampleRequest, ApiError>;

    async fn get_inquiries(&self, status: Option<InquiryStatus>, page: &PageQuery) -> Result<InquiryPage, ApiError>;

    async fn get_sample_requests(&self, page: &PageQuery) -> Result<SampleRequestPage, ApiError>;

    async fn get_analytics(&self) -> Result<Analytics, ApiError>;

    /// Returns the server's copy of the inquiry after the update.
    async fn update_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, ApiError>;

    async fn health(&self) -> Result<(), ApiError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

pub struct HttpLeadApi {
    http: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl HttpLeadApi {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.submission_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), admin_token: config.admin_token.clone() })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, endpoint(&self.base_url, path))
    }

    fn admin_request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.request(method, path);
        match self.admin_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl LeadApi for HttpLeadApi {
    async fn create_inquiry(&self, submission: &InquirySubmission) -> Result<Inquiry, ApiError> {
        send_json(self.request(Method::POST, "/api/inquiries").json(submission)).await
    }

    async fn create_sample_request(&self, submission: &SampleRequestSubmission) -> Result<SampleRequest, ApiError> {
        send_json(self.request(Method::POST, "/api/sample-requests").json(submission)).await
    }

    async fn get_inquiries(&self, status: Option<InquiryStatus>, page: &PageQuery) -> Result<InquiryPage, ApiError> {
        let mut params = page_params(page);
        if let Some(status) = status {
            params.push(("status", status.as_str().to_owned()));
        }
        send_json(self.admin_request(Method::GET, "/api/inquiries").query(&params)).await
    }

    async fn get_sample_requests(&self, page: &PageQuery) -> Result<SampleRequestPage, ApiError> {
        let params = page_params(page);
        send_json(self.admin_request(Method::GET, "/api/sample-requests").query(&params)).await
    }

    async fn get_analytics(&self) -> Result<Analytics, ApiError> {
        send_json(self.admin_request(Method::GET, "/api/analytics")).await
    }

    async fn update_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, ApiError> {
        let body = StatusUpdate { status: status.as_str().to_owned() };
        let path = format!("/api/inquiries/{id}/status");
        let response: StatusUpdateResponse = send_json(self.admin_request(Method::PATCH, &path).json(&body)).await?;
        match response {
            StatusUpdateResponse { success: true, inquiry: Some(inquiry) } => Ok(inquiry),
            _ => Err(ApiError::Decode("status update reply carried no inquiry".into())),
        }
    }

    async fn health(&self) -> Result<(), ApiError> {
        let response = self.request(Method::GET, "/healthz").send().await.map_err(transport_error)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Status { status: response.status().as_u16(), body: None })
        }
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.json::<ErrorBody>().await.ok();
        tracing::debug!(status = status.as_u16(), code = body.as_ref().map(|b| b.error.code.as_str()), "api error");
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() { ApiError::Timeout } else { ApiError::Transport(err.to_string()) }
}

fn page_params(page: &PageQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(size) = page.page_size {
        params.push(("pageSize", size.to_string()));
    }
    if let Some(cursor) = page.cursor.as_deref() {
        params.push(("cursor", cursor.to_owned()));
    }
    params
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
