//! Lead records and the JSON bodies exchanged over HTTP.
//!
//! All wire types use camelCase field names to match the site's forms and
//! dashboard. Timestamps travel as RFC 3339 strings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::{Interest, Region, TeaType, UnknownOption};
use crate::validate::FieldViolation;

// =============================================================================
// STATUS / KIND
// =============================================================================

/// Follow-up state of an inquiry. Any status may follow any other; the admin
/// is allowed to move a closed inquiry back to `new` to correct a mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Contacted,
    Quoted,
    Closed,
}

impl InquiryStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::Contacted, Self::Quoted, Self::Closed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Quoted => "quoted",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for InquiryStatus {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownOption { catalog: "status", value: s.to_owned() })
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of lead the site captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadKind {
    Inquiry,
    SampleRequest,
}

impl LeadKind {
    /// Acknowledgement shown to the visitor after a successful submission.
    #[must_use]
    pub fn acknowledgement(self) -> &'static str {
        match self {
            Self::Inquiry => "Thank you for your inquiry! We will contact you within 24 hours.",
            Self::SampleRequest => {
                "Sample request submitted successfully! We will prepare and send samples within 3-5 business days."
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inquiry => "inquiry",
            Self::SampleRequest => "sample_request",
        }
    }
}

// =============================================================================
// SUBMISSIONS (untrusted input)
// =============================================================================

/// Raw inquiry form payload, as posted to `POST /api/inquiries`.
///
/// Every field is a plain string so that validation, not deserialization,
/// decides what is wrong with a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquirySubmission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Raw sample-request payload, as posted to `POST /api/sample-requests`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequestSubmission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub tea_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// VALIDATED INPUT
// =============================================================================

/// An inquiry that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<Region>,
    pub interest: Option<Interest>,
    pub message: Option<String>,
}

/// A sample request that passed validation. `tea_types` is non-empty,
/// duplicate-free, and in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSampleRequest {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub tea_types: Vec<TeaType>,
    pub quantities: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// RECORDS
// =============================================================================

/// A stored inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<Region>,
    pub interest: Option<Interest>,
    pub message: Option<String>,
    pub status: InquiryStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Inquiry {
    /// Build a fresh record with status `new` and `updated_at == created_at`.
    #[must_use]
    pub fn create(id: Uuid, new: NewInquiry, now: OffsetDateTime) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            company: new.company,
            email: new.email,
            phone: new.phone,
            country: new.country,
            interest: new.interest,
            message: new.message,
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A stored sample request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub tea_types: Vec<TeaType>,
    pub quantities: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl SampleRequest {
    #[must_use]
    pub fn create(id: Uuid, new: NewSampleRequest, now: OffsetDateTime) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            company: new.company,
            email: new.email,
            phone: new.phone,
            country: new.country,
            tea_types: new.tea_types,
            quantities: new.quantities,
            notes: new.notes,
            created_at: now,
        }
    }
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_inquiries: u64,
    pub total_sample_requests: u64,
    pub total_leads: u64,
}

/// Counts computed over every stored lead at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub stats: LeadStats,
    pub country_breakdown: BTreeMap<String, u64>,
}

impl Analytics {
    #[must_use]
    pub fn new(total_inquiries: u64, total_sample_requests: u64, country_breakdown: BTreeMap<String, u64>) -> Self {
        Self {
            stats: LeadStats {
                total_inquiries,
                total_sample_requests,
                total_leads: total_inquiries + total_sample_requests,
            },
            country_breakdown,
        }
    }
}

/// Breakdown key for a stored country value: trimmed and lower-cased.
/// Blank values are not counted.
#[must_use]
pub fn country_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_lowercase()) }
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

/// `GET /api/inquiries` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPage {
    pub inquiries: Vec<Inquiry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// `GET /api/sample-requests` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequestPage {
    pub sample_requests: Vec<SampleRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// `PATCH /api/inquiries/{id}/status` request body. The status stays a
/// string here so an unknown value surfaces as a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiry: Option<Inquiry>,
}

/// JSON error envelope returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Grepable `E_*` code.
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub value: String,
    pub label: String,
}

/// `GET /api/catalog` response: every option the forms may submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub regions: Vec<CatalogEntry>,
    pub interests: Vec<CatalogEntry>,
    pub tea_types: Vec<CatalogEntry>,
    pub statuses: Vec<String>,
}

impl CatalogResponse {
    #[must_use]
    pub fn current() -> Self {
        let entry = |value: &str, label: &str| CatalogEntry { value: value.to_owned(), label: label.to_owned() };
        Self {
            regions: Region::ALL.iter().map(|r| entry(r.as_str(), r.label())).collect(),
            interests: Interest::ALL.iter().map(|i| entry(i.as_str(), i.label())).collect(),
            tea_types: TeaType::ALL.iter().map(|t| entry(t.as_str(), t.as_str())).collect(),
            statuses: InquiryStatus::ALL.iter().map(|s| s.as_str().to_owned()).collect(),
        }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
