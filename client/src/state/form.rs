//! Form state for the contact form and the sample-request modal.
//!
//! DESIGN
//! ======
//! `FormState` is a plain value and `reduce` is a pure function from
//! `(state, action)` to the next state. Whatever renders the form owns the
//! current value and swaps it on every action, so every transition can be
//! tested without a runtime or a network.

use std::collections::BTreeSet;

use leads::{InquirySubmission, SampleRequestSubmission, TeaType};

// =============================================================================
// PHASE / ACTIONS
// =============================================================================

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction<E> {
    Edit(E),
    SubmitStarted,
    SubmitSucceeded { message: String },
    SubmitFailed { message: String },
    /// Return a finished form to `Idle` (the modal closing after success).
    Reset,
}

/// Field set of one form.
pub trait FormFields: Clone + Default {
    type Edit;
    type Submission;

    #[must_use]
    fn apply(self, edit: Self::Edit) -> Self;

    /// Wire payload for the current field values.
    fn to_submission(&self) -> Self::Submission;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState<F> {
    pub fields: F,
    pub phase: SubmitPhase,
}

impl<F: FormFields> FormState<F> {
    /// False while a submission is in flight, which keeps a double click
    /// from sending the same lead twice.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase != SubmitPhase::Submitting
    }
}

/// Next form state after `action`.
#[must_use]
pub fn reduce<F: FormFields>(state: FormState<F>, action: FormAction<F::Edit>) -> FormState<F> {
    match action {
        FormAction::Edit(edit) => {
            let phase = match state.phase {
                SubmitPhase::Submitting => SubmitPhase::Submitting,
                _ => SubmitPhase::Idle,
            };
            FormState { fields: state.fields.apply(edit), phase }
        }
        FormAction::SubmitStarted => FormState { fields: state.fields, phase: SubmitPhase::Submitting },
        FormAction::SubmitSucceeded { message } => {
            FormState { fields: F::default(), phase: SubmitPhase::Succeeded { message } }
        }
        FormAction::SubmitFailed { message } => FormState { fields: state.fields, phase: SubmitPhase::Failed { message } },
        FormAction::Reset => FormState { fields: state.fields, phase: SubmitPhase::Idle },
    }
}

// =============================================================================
// INQUIRY FORM
// =============================================================================

/// Contact form fields, exactly as typed. `country` and `interest` hold the
/// selected catalog slug, or an empty string for "no selection".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryFields {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub interest: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InquiryEdit {
    FirstName(String),
    LastName(String),
    Company(String),
    Email(String),
    Phone(String),
    Country(String),
    Interest(String),
    Message(String),
}

impl FormFields for InquiryFields {
    type Edit = InquiryEdit;
    type Submission = InquirySubmission;

    fn apply(mut self, edit: InquiryEdit) -> Self {
        match edit {
            InquiryEdit::FirstName(v) => self.first_name = v,
            InquiryEdit::LastName(v) => self.last_name = v,
            InquiryEdit::Company(v) => self.company = v,
            InquiryEdit::Email(v) => self.email = v,
            InquiryEdit::Phone(v) => self.phone = v,
            InquiryEdit::Country(v) => self.country = v,
            InquiryEdit::Interest(v) => self.interest = v,
            InquiryEdit::Message(v) => self.message = v,
        }
        self
    }

    fn to_submission(&self) -> InquirySubmission {
        InquirySubmission {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            phone: optional(&self.phone),
            country: optional(&self.country),
            interest: optional(&self.interest),
            message: optional(&self.message),
        }
    }
}

// =============================================================================
// SAMPLE REQUEST FORM
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleRequestFields {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    /// Checked tea types; iteration is catalog order.
    pub tea_types: BTreeSet<TeaType>,
    pub quantities: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleRequestEdit {
    FirstName(String),
    LastName(String),
    Company(String),
    Email(String),
    Phone(String),
    Country(String),
    /// Check the box if unchecked, uncheck it otherwise.
    ToggleTeaType(TeaType),
    Quantities(String),
    Notes(String),
}

impl FormFields for SampleRequestFields {
    type Edit = SampleRequestEdit;
    type Submission = SampleRequestSubmission;

    fn apply(mut self, edit: SampleRequestEdit) -> Self {
        match edit {
            SampleRequestEdit::FirstName(v) => self.first_name = v,
            SampleRequestEdit::LastName(v) => self.last_name = v,
            SampleRequestEdit::Company(v) => self.company = v,
            SampleRequestEdit::Email(v) => self.email = v,
            SampleRequestEdit::Phone(v) => self.phone = v,
            SampleRequestEdit::Country(v) => self.country = v,
            SampleRequestEdit::ToggleTeaType(tea) => {
                if !self.tea_types.remove(&tea) {
                    self.tea_types.insert(tea);
                }
            }
            SampleRequestEdit::Quantities(v) => self.quantities = v,
            SampleRequestEdit::Notes(v) => self.notes = v,
        }
        self
    }

    fn to_submission(&self) -> SampleRequestSubmission {
        SampleRequestSubmission {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            phone: optional(&self.phone),
            country: optional(&self.country),
            tea_types: self.tea_types.iter().map(|t| t.as_str().to_owned()).collect(),
            quantities: optional(&self.quantities),
            notes: optional(&self.notes),
        }
    }
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;
