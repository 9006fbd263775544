//! Shared lead model, catalogs, and validation for the ChaiTrade site.
//!
//! This crate owns the wire representation used by both `server` and
//! `client`. Submissions arrive as loose string payloads and are turned into
//! typed records by [`validate`]; the same functions run in the browser-side
//! client before sending and again on the server before persisting, so the
//! two sides cannot drift apart on what a valid lead is.

pub mod catalog;
pub mod model;
pub mod validate;

pub use catalog::{Interest, Region, TeaType, UnknownOption};
pub use model::{
    Analytics, CatalogEntry, CatalogResponse, ErrorBody, ErrorDetail, Inquiry, InquiryPage, InquirySubmission,
    InquiryStatus, LeadKind, LeadStats, NewInquiry, NewSampleRequest, SampleRequest, SampleRequestPage,
    SampleRequestSubmission, StatusUpdate, StatusUpdateResponse, country_key,
};
pub use validate::{
    EmailPolicy, FieldViolation, Problem, ValidationError, is_valid_email, validate_inquiry, validate_sample_request,
};
