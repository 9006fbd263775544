//! Lead submission: pre-flight validation, one network write, and the form
//! surface that drives it.
//!
//! DESIGN
//! ======
//! `SubmissionClient::submit` validates locally first and never touches the
//! network for a payload the server would reject anyway. A valid payload gets
//! exactly one request, bounded by the configured timeout; there is no
//! automatic retry.
//!
//! `FormSurface` binds a `FormState` to a client and a `Liveness` flag. It
//! refuses a second submit while one is in flight, drops results that land
//! after teardown, and (for the sample-request modal) closes itself a few
//! seconds after a success unless it was torn down first.
//!
//! ERROR HANDLING
//! ==============
//! Every failure comes back as `SubmissionError` with a human-readable
//! `reason()`. Validation failures name the problem; everything else gets the
//! generic retry message, and the form keeps what the visitor typed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leads::{
    EmailPolicy, InquirySubmission, LeadKind, SampleRequestSubmission, ValidationError, validate_inquiry,
    validate_sample_request,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::net::api::{ApiError, LeadApi};
use crate::state::form::{FormAction, FormFields, FormState, SubmitPhase, reduce};
use crate::util::liveness::Liveness;
use crate::util::lock;

/// How long the sample-request modal shows its success message.
pub const SAMPLE_MODAL_DISMISS_DELAY: Duration = Duration::from_secs(3);

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again or contact us directly.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Inquiry(InquirySubmission),
    SampleRequest(SampleRequestSubmission),
}

impl Submission {
    #[must_use]
    pub fn kind(&self) -> LeadKind {
        match self {
            Self::Inquiry(_) => LeadKind::Inquiry,
            Self::SampleRequest(_) => LeadKind::SampleRequest,
        }
    }
}

impl From<InquirySubmission> for Submission {
    fn from(value: InquirySubmission) -> Self {
        Self::Inquiry(value)
    }
}

impl From<SampleRequestSubmission> for Submission {
    fn from(value: SampleRequestSubmission) -> Self {
        Self::SampleRequest(value)
    }
}

/// What the visitor sees after a lead is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub kind: LeadKind,
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(ValidationError),
    #[error("server rejected submission ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("submission timed out")]
    Timeout,
}

impl SubmissionError {
    /// Message to show next to the form.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Invalid(err) => err.user_message(),
            Self::Rejected { .. } | Self::Transport(_) | Self::Timeout => GENERIC_FAILURE,
        }
    }
}

impl From<ApiError> for SubmissionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => Self::Rejected {
                status,
                message: body.map_or_else(|| format!("HTTP {status}"), |b| b.error.message),
            },
            ApiError::Timeout => Self::Timeout,
            ApiError::Transport(msg) | ApiError::Decode(msg) => Self::Transport(msg),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct SubmissionClient<A: ?Sized> {
    api: Arc<A>,
    timeout: Duration,
    email_policy: EmailPolicy,
}

impl<A: LeadApi + ?Sized> SubmissionClient<A> {
    #[must_use]
    pub fn new(api: Arc<A>, config: &ClientConfig) -> Self {
        Self { api, timeout: config.submission_timeout, email_policy: config.email_policy }
    }

    /// Validate, then send exactly one create request.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::Invalid`] without any network call when the payload
    /// fails validation; otherwise the transport, rejection or timeout error
    /// of the single request.
    pub async fn submit(&self, submission: Submission) -> Result<Confirmation, SubmissionError> {
        let kind = submission.kind();
        self.precheck(&submission).map_err(|err| {
            warn!(kind = kind.as_str(), fields = ?err.fields(), "submission blocked by validation");
            SubmissionError::Invalid(err)
        })?;

        let request = async {
            match &submission {
                Submission::Inquiry(payload) => self.api.create_inquiry(payload).await.map(|i| i.id),
                Submission::SampleRequest(payload) => self.api.create_sample_request(payload).await.map(|r| r.id),
            }
        };
        let id = match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(kind = kind.as_str(), timeout = ?self.timeout, "submission timed out");
                return Err(SubmissionError::Timeout);
            }
        };

        info!(kind = kind.as_str(), %id, "lead submitted");
        Ok(Confirmation { kind, id, message: kind.acknowledgement().to_owned() })
    }

    fn precheck(&self, submission: &Submission) -> Result<(), ValidationError> {
        match submission {
            Submission::Inquiry(payload) => validate_inquiry(payload, self.email_policy).map(drop),
            Submission::SampleRequest(payload) => validate_sample_request(payload, self.email_policy).map(drop),
        }
    }
}

// =============================================================================
// FORM SURFACE
// =============================================================================

/// Result of asking a surface to submit.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing was sent.
    AlreadySubmitting,
    /// The surface was torn down before the reply arrived; state untouched.
    Dropped,
    Finished(Result<Confirmation, SubmissionError>),
}

/// A mounted form: its state, the client that submits it, and its lifetime.
pub struct FormSurface<F, A: ?Sized> {
    state: Arc<Mutex<FormState<F>>>,
    client: SubmissionClient<A>,
    liveness: Liveness,
    open: Arc<AtomicBool>,
    dismiss_after: Option<Duration>,
    dismiss_task: Mutex<Option<JoinHandle<()>>>,
}

impl<F, A> FormSurface<F, A>
where
    F: FormFields + Send + 'static,
    F::Submission: Into<Submission>,
    A: LeadApi + ?Sized,
{
    /// An inline form that stays open after success.
    #[must_use]
    pub fn new(client: SubmissionClient<A>) -> Self {
        Self::build(client, None)
    }

    /// A modal that closes itself `delay` after a successful submit.
    #[must_use]
    pub fn modal(client: SubmissionClient<A>, delay: Duration) -> Self {
        Self::build(client, Some(delay))
    }

    fn build(client: SubmissionClient<A>, dismiss_after: Option<Duration>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            client,
            liveness: Liveness::new(),
            open: Arc::new(AtomicBool::new(true)),
            dismiss_after,
            dismiss_task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> FormState<F> {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn edit(&self, edit: F::Edit) {
        let mut state = lock(&self.state);
        *state = reduce(state.clone(), FormAction::Edit(edit));
    }

    /// Submit the current fields once.
    pub async fn submit(&self) -> SubmitOutcome {
        let submission: Submission = {
            let mut state = lock(&self.state);
            if !state.can_submit() {
                return SubmitOutcome::AlreadySubmitting;
            }
            *state = reduce(state.clone(), FormAction::SubmitStarted);
            state.fields.to_submission().into()
        };
        let mut pending = Pending { state: &*self.state, armed: true };

        let result = self.client.submit(submission).await;
        pending.armed = false;
        if !self.liveness.is_alive() {
            return SubmitOutcome::Dropped;
        }

        {
            let mut state = lock(&self.state);
            let action = match &result {
                Ok(confirmation) => FormAction::SubmitSucceeded { message: confirmation.message.clone() },
                Err(err) => FormAction::SubmitFailed { message: err.reason().to_owned() },
            };
            *state = reduce(state.clone(), action);
        }

        if let (Ok(_), Some(delay)) = (&result, self.dismiss_after) {
            self.schedule_dismiss(delay);
        }
        SubmitOutcome::Finished(result)
    }

    /// Tear the surface down: pending results are dropped and a scheduled
    /// dismiss never fires.
    pub fn teardown(&self) {
        self.liveness.kill();
        if let Some(task) = lock(&self.dismiss_task).take() {
            task.abort();
        }
    }

    fn schedule_dismiss(&self, delay: Duration) {
        let state = Arc::clone(&self.state);
        let open = Arc::clone(&self.open);
        let task = schedule_dismiss(delay, self.liveness.clone(), move || {
            open.store(false, Ordering::Release);
            let mut state = lock(&state);
            *state = reduce(state.clone(), FormAction::Reset);
        });
        if let Some(previous) = lock(&self.dismiss_task).replace(task) {
            previous.abort();
        }
    }
}

/// Returns the form to `Idle` when a submit future is dropped mid-flight.
struct Pending<'a, F: FormFields> {
    state: &'a Mutex<FormState<F>>,
    armed: bool,
}

impl<F: FormFields> Drop for Pending<'_, F> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock(self.state);
        if state.phase == SubmitPhase::Submitting {
            *state = reduce(state.clone(), FormAction::Reset);
        }
    }
}

impl<F, A: ?Sized> Drop for FormSurface<F, A> {
    fn drop(&mut self) {
        self.liveness.kill();
        if let Some(task) = lock(&self.dismiss_task).take() {
            task.abort();
        }
    }
}

/// Run `dismiss` after `delay` unless the surface died in the meantime.
pub fn schedule_dismiss(
    delay: Duration,
    liveness: Liveness,
    dismiss: impl FnOnce() + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if liveness.is_alive() {
            dismiss();
        }
    })
}

#[cfg(test)]
#[path = "submission_test.rs"]
mod submission_test;
