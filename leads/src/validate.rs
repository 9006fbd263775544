//! Submission validation shared by the client and the server.
//!
//! DESIGN
//! ======
//! Validation is a pure function from an untrusted submission to either a
//! typed `New*` record or a [`ValidationError`] naming every bad field. All
//! violations are collected in one pass so a form can highlight every field
//! at once instead of failing on the first.
//!
//! Required fields are judged after trimming. Optional fields that are blank
//! after trimming are treated as absent.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{Interest, Region, TeaType};
use crate::model::{InquirySubmission, NewInquiry, NewSampleRequest, SampleRequestSubmission};

// =============================================================================
// TYPES
// =============================================================================

/// How much checking the email field gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailPolicy {
    /// Reject addresses that are not `local@domain.tld` shaped.
    #[default]
    Strict,
    /// Accept any non-empty string.
    Lenient,
}

impl FromStr for EmailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown email policy '{other}' (expected 'strict' or 'lenient')")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    Missing,
    Malformed,
    UnknownOption,
}

/// One rejected field, named as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", self.fields().join(", "))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    #[must_use]
    pub fn single(field: &str, problem: Problem) -> Self {
        Self { violations: vec![FieldViolation { field: field.to_owned(), problem }] }
    }

    /// Names of the rejected fields, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Banner text for the form.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        let missing_contact = self
            .violations
            .iter()
            .any(|v| v.problem == Problem::Missing && v.field != "teaTypes");
        if missing_contact {
            "Please fill in all required fields."
        } else if self.has("teaTypes") {
            "Please select at least one tea type."
        } else {
            "Please check the highlighted fields and try again."
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Validate an inquiry form submission.
///
/// # Errors
///
/// Returns every violated field when the submission is not acceptable.
pub fn validate_inquiry(sub: &InquirySubmission, policy: EmailPolicy) -> Result<NewInquiry, ValidationError> {
    let mut check = Checker::default();

    let first_name = check.required("firstName", &sub.first_name);
    let last_name = check.required("lastName", &sub.last_name);
    let company = check.required("company", &sub.company);
    let email = check.email(&sub.email, policy);
    let phone = optional(sub.phone.as_deref());
    let country = check.option::<Region>("country", sub.country.as_deref());
    let interest = check.option::<Interest>("interest", sub.interest.as_deref());
    let message = optional(sub.message.as_deref());

    check.finish()?;
    Ok(NewInquiry { first_name, last_name, company, email, phone, country, interest, message })
}

/// Validate a sample-request submission. At least one catalog tea type is
/// required regardless of the other fields.
///
/// # Errors
///
/// Returns every violated field when the submission is not acceptable.
pub fn validate_sample_request(
    sub: &SampleRequestSubmission,
    policy: EmailPolicy,
) -> Result<NewSampleRequest, ValidationError> {
    let mut check = Checker::default();

    let first_name = check.required("firstName", &sub.first_name);
    let last_name = check.required("lastName", &sub.last_name);
    let company = check.required("company", &sub.company);
    let email = check.email(&sub.email, policy);
    let phone = optional(sub.phone.as_deref());
    let country = optional(sub.country.as_deref());
    let tea_types = check.tea_types(&sub.tea_types);
    let quantities = optional(sub.quantities.as_deref());
    let notes = optional(sub.notes.as_deref());

    check.finish()?;
    Ok(NewSampleRequest { first_name, last_name, company, email, phone, country, tea_types, quantities, notes })
}

/// Structural email check: one `@`, non-empty local part, and a dotted
/// domain of alphanumeric/hyphen labels. No whitespace anywhere.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let email = raw.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

// =============================================================================
// HELPERS
// =============================================================================

#[derive(Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn flag(&mut self, field: &str, problem: Problem) {
        self.violations.push(FieldViolation { field: field.to_owned(), problem });
    }

    fn required(&mut self, field: &str, raw: &str) -> String {
        let value = raw.trim();
        if value.is_empty() {
            self.flag(field, Problem::Missing);
        }
        value.to_owned()
    }

    fn email(&mut self, raw: &str, policy: EmailPolicy) -> String {
        let value = self.required("email", raw);
        if !value.is_empty() && policy == EmailPolicy::Strict && !is_valid_email(&value) {
            self.flag("email", Problem::Malformed);
        }
        value
    }

    fn option<T: FromStr>(&mut self, field: &str, raw: Option<&str>) -> Option<T> {
        let value = optional(raw)?;
        if let Ok(parsed) = value.parse::<T>() {
            Some(parsed)
        } else {
            self.flag(field, Problem::UnknownOption);
            None
        }
    }

    fn tea_types(&mut self, raw: &[String]) -> Vec<TeaType> {
        if raw.iter().all(|t| t.trim().is_empty()) {
            self.flag("teaTypes", Problem::Missing);
            return Vec::new();
        }
        let mut picked = BTreeSet::new();
        let mut unknown = false;
        for value in raw.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            match value.parse::<TeaType>() {
                Ok(tea) => {
                    picked.insert(tea);
                }
                Err(_) => unknown = true,
            }
        }
        if unknown {
            self.flag("teaTypes", Problem::UnknownOption);
        }
        picked.into_iter().collect()
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() { Ok(()) } else { Err(ValidationError { violations: self.violations }) }
    }
}

fn optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
