//! Lead store: the persistence boundary for inquiries and sample requests.
//!
//! DESIGN
//! ======
//! `LeadStore` is the capability the lead service depends on. Two
//! implementations exist: `PgLeadStore` for production and
//! `MemoryLeadStore` for tests and database-less runs. Both assign ids and
//! timestamps, order listings newest first, and compute analytics at query
//! time over every stored record.
//!
//! Listings page with a keyset cursor over `(created_at, id)`, so records
//! inserted while an admin is paging never shift later pages.
//!
//! CONCURRENCY
//! ===========
//! Concurrent status updates on the same inquiry are serialized by the
//! backing store; the last write to complete wins.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use leads::{Analytics, Inquiry, InquiryStatus, NewInquiry, NewSampleRequest, SampleRequest};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

pub use memory::MemoryLeadStore;
pub use postgres::PgLeadStore;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("inquiry not found: {0}")]
    NotFound(Uuid),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// PAGING
// =============================================================================

/// Position after the last record of a page, in newest-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: OffsetDateTime,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed cursor: {0}")]
pub struct CursorError(String);

impl Cursor {
    #[must_use]
    pub fn new(created_at: OffsetDateTime, id: Uuid) -> Self {
        Self { created_at, id }
    }

    /// True when a record keyed `(created_at, id)` sorts after this cursor.
    #[must_use]
    pub fn precedes(&self, created_at: OffsetDateTime, id: Uuid) -> bool {
        (created_at, id) < (self.created_at, self.id)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let micros = self.created_at.unix_timestamp_nanos() / 1_000;
        write!(f, "{micros}_{}", self.id)
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CursorError(s.to_owned());
        let (micros, id) = s.split_once('_').ok_or_else(malformed)?;
        let micros: i128 = micros.parse().map_err(|_| malformed())?;
        let nanos = micros.checked_mul(1_000).ok_or_else(malformed)?;
        let created_at = OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|_| malformed())?;
        let id = Uuid::parse_str(id).map_err(|_| malformed())?;
        Ok(Self { created_at, id })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub size: u32,
    pub cursor: Option<Cursor>,
}

impl PageRequest {
    #[must_use]
    pub fn first(size: u32) -> Self {
        Self { size, cursor: None }
    }

    pub(crate) fn fetch_limit(&self) -> usize {
        self.size as usize + 1
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InquiryFilter {
    pub status: Option<InquiryStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Trim an over-fetched result (`size + 1` rows, newest first) to a page,
    /// emitting a cursor only when a further record exists.
    pub(crate) fn from_overfetch(mut rows: Vec<T>, size: u32, key: impl Fn(&T) -> Cursor) -> Self {
        let size = size as usize;
        if rows.len() <= size {
            return Self { items: rows, next_cursor: None };
        }
        rows.truncate(size);
        let next_cursor = rows.last().map(key);
        Self { items: rows, next_cursor }
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Persistence capability for leads. Enables swapping Postgres for the
/// in-memory store in tests.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Persist a validated inquiry with status `new` and
    /// `updated_at == created_at`.
    async fn create_inquiry(&self, new: NewInquiry) -> Result<Inquiry, StoreError>;

    async fn create_sample_request(&self, new: NewSampleRequest) -> Result<SampleRequest, StoreError>;

    /// Newest-first page of inquiries, optionally filtered by status.
    async fn list_inquiries(&self, filter: InquiryFilter, page: PageRequest) -> Result<Page<Inquiry>, StoreError>;

    async fn list_sample_requests(&self, page: PageRequest) -> Result<Page<SampleRequest>, StoreError>;

    /// Set an inquiry's status and advance its `updated_at`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no inquiry has `id`; the store is left
    /// unchanged.
    async fn update_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, StoreError>;

    async fn aggregate(&self) -> Result<Analytics, StoreError>;
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Current time truncated to microseconds, the precision Postgres keeps.
/// Truncating up front means a record reads back exactly as it was written.
pub(crate) fn now_micros() -> OffsetDateTime {
    truncate_micros(OffsetDateTime::now_utc())
}

pub(crate) fn truncate_micros(at: OffsetDateTime) -> OffsetDateTime {
    let nanos = at.nanosecond();
    at.replace_nanosecond(nanos - nanos % 1_000).unwrap_or(at)
}

/// Timestamp for a status change: now, but always strictly after `previous`.
pub(crate) fn next_update_timestamp(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    now.max(previous + Duration::microseconds(1))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
