//! In-process `LeadApi` fake for client tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use leads::{
    Analytics, Inquiry, InquiryPage, InquiryStatus, InquirySubmission, NewInquiry, NewSampleRequest, SampleRequest,
    SampleRequestPage, SampleRequestSubmission,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::net::api::{ApiError, LeadApi, PageQuery};

#[derive(Default)]
pub struct FakeApi {
    pub inquiries: Mutex<Vec<Inquiry>>,
    pub analytics: Mutex<Analytics>,
    pub fail_writes: AtomicBool,
    pub fail_inquiries: AtomicBool,
    pub fail_analytics: AtomicBool,
    pub fail_updates: AtomicBool,
    /// Applied to every call before it answers.
    pub delay: Mutex<Duration>,
    pub creates: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub updates: AtomicUsize,
}

impl FakeApi {
    pub fn with_inquiries(inquiries: Vec<Inquiry>) -> Self {
        Self { inquiries: Mutex::new(inquiries), ..Self::default() }
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn server_error() -> ApiError {
    ApiError::Status { status: 500, body: None }
}

fn new_inquiry(first_name: &str, last_name: &str, company: &str, email: &str) -> NewInquiry {
    NewInquiry {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        company: company.to_owned(),
        email: email.to_owned(),
        phone: None,
        country: None,
        interest: None,
        message: None,
    }
}

pub fn inquiry(n: u128, status: InquiryStatus) -> Inquiry {
    let new = new_inquiry("Jane", "Doe", &format!("Company {n}"), "jane@acme.com");
    let created = OffsetDateTime::UNIX_EPOCH + time::Duration::days(20_000) + time::Duration::seconds(i64::try_from(n).unwrap());
    Inquiry { status, ..Inquiry::create(Uuid::from_u128(n), new, created) }
}

#[async_trait]
impl LeadApi for FakeApi {
    async fn create_inquiry(&self, submission: &InquirySubmission) -> Result<Inquiry, ApiError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let new = new_inquiry(&submission.first_name, &submission.last_name, &submission.company, &submission.email);
        Ok(Inquiry::create(Uuid::new_v4(), new, OffsetDateTime::now_utc()))
    }

    async fn create_sample_request(&self, submission: &SampleRequestSubmission) -> Result<SampleRequest, ApiError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection reset".into()));
        }
        let new = NewSampleRequest {
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            company: submission.company.clone(),
            email: submission.email.clone(),
            phone: None,
            country: submission.country.clone(),
            tea_types: Vec::new(),
            quantities: None,
            notes: None,
        };
        Ok(SampleRequest::create(Uuid::new_v4(), new, OffsetDateTime::now_utc()))
    }

    /// Pages by offset; the cursor is the index of the next row.
    async fn get_inquiries(&self, status: Option<InquiryStatus>, page: &PageQuery) -> Result<InquiryPage, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_inquiries.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let matching: Vec<Inquiry> = self
            .inquiries
            .lock()
            .unwrap()
            .iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .cloned()
            .collect();
        let offset = page.cursor.as_deref().map_or(0, |c| c.parse::<usize>().unwrap());
        let size = page.page_size.map_or(matching.len(), |s| s as usize);
        let end = (offset + size).min(matching.len());
        let next_cursor = (end < matching.len()).then(|| end.to_string());
        Ok(InquiryPage { inquiries: matching[offset..end].to_vec(), next_cursor })
    }

    async fn get_sample_requests(&self, _page: &PageQuery) -> Result<SampleRequestPage, ApiError> {
        self.pause().await;
        Ok(SampleRequestPage::default())
    }

    async fn get_analytics(&self) -> Result<Analytics, ApiError> {
        self.pause().await;
        if self.fail_analytics.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self.analytics.lock().unwrap().clone())
    }

    async fn update_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, ApiError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let mut inquiries = self.inquiries.lock().unwrap();
        let record = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ApiError::Status { status: 404, body: None })?;
        record.status = status;
        record.updated_at += time::Duration::seconds(1);
        Ok(record.clone())
    }

    async fn health(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
