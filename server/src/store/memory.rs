//! In-memory lead store.
//!
//! Backs the test suite and database-less local runs. Records live in two
//! maps behind one `RwLock`; writes take the write lock, so concurrent status
//! updates apply in lock-acquisition order.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use leads::{Analytics, Inquiry, InquiryStatus, NewInquiry, NewSampleRequest, SampleRequest, country_key};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Cursor, InquiryFilter, LeadStore, Page, PageRequest, StoreError, next_update_timestamp, now_micros};

#[derive(Default)]
pub struct MemoryLeadStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    inquiries: HashMap<Uuid, Inquiry>,
    sample_requests: HashMap<Uuid, SampleRequest>,
}

impl MemoryLeadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing id/timestamp assignment.
    #[cfg(test)]
    pub(crate) async fn insert_inquiry(&self, inquiry: Inquiry) {
        self.inner.write().await.inquiries.insert(inquiry.id, inquiry);
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn create_inquiry(&self, new: NewInquiry) -> Result<Inquiry, StoreError> {
        let inquiry = Inquiry::create(Uuid::new_v4(), new, now_micros());
        self.inner.write().await.inquiries.insert(inquiry.id, inquiry.clone());
        Ok(inquiry)
    }

    async fn create_sample_request(&self, new: NewSampleRequest) -> Result<SampleRequest, StoreError> {
        let request = SampleRequest::create(Uuid::new_v4(), new, now_micros());
        self.inner.write().await.sample_requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn list_inquiries(&self, filter: InquiryFilter, page: PageRequest) -> Result<Page<Inquiry>, StoreError> {
        let inner = self.inner.read().await;
        let rows = newest_first(
            inner
                .inquiries
                .values()
                .filter(|i| filter.status.is_none_or(|status| i.status == status)),
            page,
            |i| Cursor::new(i.created_at, i.id),
        );
        Ok(Page::from_overfetch(rows, page.size, |i| Cursor::new(i.created_at, i.id)))
    }

    async fn list_sample_requests(&self, page: PageRequest) -> Result<Page<SampleRequest>, StoreError> {
        let inner = self.inner.read().await;
        let rows = newest_first(inner.sample_requests.values(), page, |r| Cursor::new(r.created_at, r.id));
        Ok(Page::from_overfetch(rows, page.size, |r| Cursor::new(r.created_at, r.id)))
    }

    async fn update_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, StoreError> {
        let mut inner = self.inner.write().await;
        let inquiry = inner.inquiries.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        inquiry.status = status;
        inquiry.updated_at = next_update_timestamp(inquiry.updated_at, now_micros());
        Ok(inquiry.clone())
    }

    async fn aggregate(&self) -> Result<Analytics, StoreError> {
        let inner = self.inner.read().await;
        let mut breakdown: BTreeMap<String, u64> = BTreeMap::new();
        let countries = inner
            .inquiries
            .values()
            .filter_map(|i| i.country.map(|c| c.as_str().to_owned()))
            .chain(inner.sample_requests.values().filter_map(|r| r.country.clone()));
        for key in countries.filter_map(|c| country_key(&c)) {
            *breakdown.entry(key).or_default() += 1;
        }
        Ok(Analytics::new(inner.inquiries.len() as u64, inner.sample_requests.len() as u64, breakdown))
    }
}

/// Sort newest first, skip everything up to the cursor, and take one more
/// than the page size so the caller can tell whether another page exists.
fn newest_first<'a, T: Clone + 'a>(
    rows: impl Iterator<Item = &'a T>,
    page: PageRequest,
    key: impl Fn(&T) -> Cursor,
) -> Vec<T> {
    let mut rows: Vec<&T> = rows
        .filter(|row| {
            let k = key(row);
            page.cursor.is_none_or(|cursor| cursor.precedes(k.created_at, k.id))
        })
        .collect();
    rows.sort_by(|a, b| {
        let (a, b) = (key(a), key(b));
        (b.created_at, b.id).cmp(&(a.created_at, a.id))
    });
    rows.into_iter().take(page.fetch_limit()).cloned().collect()
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
