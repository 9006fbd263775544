//! Postgres-backed lead store.
//!
//! Timestamps are generated here (truncated to microseconds) rather than by
//! `now()` in SQL, so `created_at == updated_at` holds exactly on insert and
//! the returned record matches what a later read produces.

use std::collections::BTreeMap;

use async_trait::async_trait;
use leads::{Analytics, Inquiry, InquiryStatus, NewInquiry, NewSampleRequest, SampleRequest, TeaType};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Cursor, InquiryFilter, LeadStore, Page, PageRequest, StoreError, now_micros};

const INQUIRY_COLUMNS: &str = "id, first_name, last_name, company, email, phone, country, interest, message, \
                               status, created_at, updated_at";
const SAMPLE_REQUEST_COLUMNS: &str = "id, first_name, last_name, company, email, phone, country, tea_types, \
                                      quantities, notes, created_at";

#[derive(Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn create_inquiry(&self, new: NewInquiry) -> Result<Inquiry, StoreError> {
        let inquiry = Inquiry::create(Uuid::new_v4(), new, now_micros());
        sqlx::query(
            "INSERT INTO inquiries
                (id, first_name, last_name, company, email, phone, country, interest, message,
                 status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(inquiry.id)
        .bind(&inquiry.first_name)
        .bind(&inquiry.last_name)
        .bind(&inquiry.company)
        .bind(&inquiry.email)
        .bind(inquiry.phone.as_deref())
        .bind(inquiry.country.map(|c| c.as_str()))
        .bind(inquiry.interest.map(|i| i.as_str()))
        .bind(inquiry.message.as_deref())
        .bind(inquiry.status.as_str())
        .bind(inquiry.created_at)
        .bind(inquiry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(inquiry)
    }

    async fn create_sample_request(&self, new: NewSampleRequest) -> Result<SampleRequest, StoreError> {
        let request = SampleRequest::create(Uuid::new_v4(), new, now_micros());
        let tea_types: Vec<String> = request.tea_types.iter().map(|t| t.as_str().to_owned()).collect();
        sqlx::query(
            "INSERT INTO sample_requests
                (id, first_name, last_name, company, email, phone, country, tea_types,
                 quantities, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(request.id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.company)
        .bind(&request.email)
        .bind(request.phone.as_deref())
        .bind(request.country.as_deref())
        .bind(tea_types)
        .bind(request.quantities.as_deref())
        .bind(request.notes.as_deref())
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;
        Ok(request)
    }

    async fn list_inquiries(&self, filter: InquiryFilter, page: PageRequest) -> Result<Page<Inquiry>, StoreError> {
        let sql = format!(
            "SELECT {INQUIRY_COLUMNS}
             FROM inquiries
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3::uuid))
             ORDER BY created_at DESC, id DESC
             LIMIT $4"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.status.map(InquiryStatus::as_str))
            .bind(page.cursor.map(|c| c.created_at))
            .bind(page.cursor.map(|c| c.id))
            .bind(fetch_limit(page))
            .fetch_all(&self.pool)
            .await?;
        let items = rows.iter().map(inquiry_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::from_overfetch(items, page.size, |i| Cursor::new(i.created_at, i.id)))
    }

    async fn list_sample_requests(&self, page: PageRequest) -> Result<Page<SampleRequest>, StoreError> {
        let sql = format!(
            "SELECT {SAMPLE_REQUEST_COLUMNS}
             FROM sample_requests
             WHERE ($1::timestamptz IS NULL OR (created_at, id) < ($1, $2::uuid))
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        let rows = sqlx::query(&sql)
            .bind(page.cursor.map(|c| c.created_at))
            .bind(page.cursor.map(|c| c.id))
            .bind(fetch_limit(page))
            .fetch_all(&self.pool)
            .await?;
        let items = rows.iter().map(sample_request_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::from_overfetch(items, page.size, |r| Cursor::new(r.created_at, r.id)))
    }

    async fn update_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, StoreError> {
        // Row lock serializes concurrent updates; the later commit wins.
        let sql = format!(
            "UPDATE inquiries
             SET status = $2,
                 updated_at = GREATEST($3, updated_at + interval '1 microsecond')
             WHERE id = $1
             RETURNING {INQUIRY_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(now_micros())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        inquiry_from_row(&row)
    }

    async fn aggregate(&self) -> Result<Analytics, StoreError> {
        let (inquiries, sample_requests) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT count(*) FROM inquiries), (SELECT count(*) FROM sample_requests)",
        )
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT key, count(*)
             FROM (
                SELECT lower(btrim(country)) AS key FROM inquiries
                UNION ALL
                SELECT lower(btrim(country)) AS key FROM sample_requests
             ) leads
             WHERE key IS NOT NULL AND key <> ''
             GROUP BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        let breakdown: BTreeMap<String, u64> = rows.into_iter().map(|(key, n)| (key, count(n))).collect();
        Ok(Analytics::new(count(inquiries), count(sample_requests), breakdown))
    }
}

// =============================================================================
// ROW MAPPING
// =============================================================================

fn inquiry_from_row(row: &PgRow) -> Result<Inquiry, StoreError> {
    let country: Option<String> = row.try_get("country")?;
    let interest: Option<String> = row.try_get("interest")?;
    let status: String = row.try_get("status")?;
    Ok(Inquiry {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        company: row.try_get("company")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        country: country.as_deref().map(str::parse).transpose().map_err(corrupt)?,
        interest: interest.as_deref().map(str::parse).transpose().map_err(corrupt)?,
        message: row.try_get("message")?,
        status: status.parse().map_err(corrupt)?,
        created_at: row.try_get::<OffsetDateTime, _>("created_at")?,
        updated_at: row.try_get::<OffsetDateTime, _>("updated_at")?,
    })
}

fn sample_request_from_row(row: &PgRow) -> Result<SampleRequest, StoreError> {
    let tea_types: Vec<String> = row.try_get("tea_types")?;
    Ok(SampleRequest {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        company: row.try_get("company")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        country: row.try_get("country")?,
        tea_types: tea_types
            .iter()
            .map(|t| t.parse::<TeaType>())
            .collect::<Result<_, _>>()
            .map_err(corrupt)?,
        quantities: row.try_get("quantities")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get::<OffsetDateTime, _>("created_at")?,
    })
}

fn corrupt(err: leads::UnknownOption) -> StoreError {
    StoreError::Storage(format!("stored row holds {err}"))
}

fn fetch_limit(page: PageRequest) -> i64 {
    i64::try_from(page.fetch_limit()).unwrap_or(i64::MAX)
}

fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "postgres_test.rs"]
mod tests;
