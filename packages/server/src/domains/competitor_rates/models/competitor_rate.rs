use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use typed_builder::TypedBuilder;

use crate::common::{Availability, BusinessId, CompetitorRateId, ExtractedRate};

/// Provenance tag for rows sourced through Firecrawl.
pub const SOURCE_FIRECRAWL: &str = "firecrawl";

pub const MANUAL_REVIEW_NOTE: &str = "Manual review needed - AI extraction unsuccessful";

/// Where a stored rate came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateProvenance {
    /// Parsed out of the page by the extractor
    Extracted {
        scraped_at: DateTime<Utc>,
        source: String,
    },
    /// Page fetched but nothing usable came back; a person has to look
    ManualReview {
        scraped_at: DateTime<Utc>,
        source: String,
        raw_content_length: usize,
        note: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl RateProvenance {
    pub fn extracted(scraped_at: DateTime<Utc>) -> Self {
        RateProvenance::Extracted {
            scraped_at,
            source: SOURCE_FIRECRAWL.to_string(),
        }
    }

    pub fn manual_review(
        scraped_at: DateTime<Utc>,
        raw_content_length: usize,
        reason: Option<String>,
    ) -> Self {
        RateProvenance::ManualReview {
            scraped_at,
            source: SOURCE_FIRECRAWL.to_string(),
            raw_content_length,
            note: MANUAL_REVIEW_NOTE.to_string(),
            reason,
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, RateProvenance::ManualReview { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompetitorRate {
    pub id: CompetitorRateId,
    pub business_id: BusinessId,
    pub competitor_name: String,
    pub competitor_url: String,
    pub room_type: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub rate: Option<Decimal>,
    pub availability: Option<String>,
    /// Run date, not stay date
    pub date: NaiveDate,
    pub metadata: Json<RateProvenance>,
    pub created_at: DateTime<Utc>,
}

/// A row waiting to be inserted.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NewCompetitorRate {
    pub business_id: BusinessId,
    #[builder(setter(into))]
    pub competitor_name: String,
    #[builder(setter(into))]
    pub competitor_url: String,
    #[builder(default)]
    pub room_type: Option<String>,
    #[builder(default)]
    pub rate: Option<Decimal>,
    #[builder(default)]
    pub availability: Option<Availability>,
    pub date: NaiveDate,
    pub metadata: RateProvenance,
}

impl NewCompetitorRate {
    /// One row per extracted item.
    pub fn from_extracted(
        business_id: BusinessId,
        competitor_name: &str,
        competitor_url: &str,
        date: NaiveDate,
        scraped_at: DateTime<Utc>,
        item: ExtractedRate,
    ) -> Self {
        Self::builder()
            .business_id(business_id)
            .competitor_name(competitor_name)
            .competitor_url(competitor_url)
            .room_type(Some(item.room_type))
            .rate(to_money(item.rate))
            .availability(Some(item.availability))
            .date(date)
            .metadata(RateProvenance::extracted(scraped_at))
            .build()
    }

    /// Placeholder row for a page the extractor could not read.
    pub fn manual_review(
        business_id: BusinessId,
        competitor_name: &str,
        competitor_url: &str,
        date: NaiveDate,
        metadata: RateProvenance,
    ) -> Self {
        Self::builder()
            .business_id(business_id)
            .competitor_name(competitor_name)
            .competitor_url(competitor_url)
            .date(date)
            .metadata(metadata)
            .build()
    }
}

/// Largest magnitude `competitor_rates.rate` (NUMERIC(12,2)) can hold.
pub const MAX_RATE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Round a model-reported rate to cents.
///
/// NaN, infinities and values the rate column cannot hold become `None` so
/// one bad item never fails the rest of the batch.
pub fn to_money(rate: f64) -> Option<Decimal> {
    Decimal::from_f64(rate)
        .map(|d| d.round_dp(2))
        .filter(|d| d.abs() <= MAX_RATE)
}

// =============================================================================
// Queries
// =============================================================================

impl CompetitorRate {
    /// Insert all rows in one statement, returning them in insertion order.
    pub async fn insert_batch(rows: &[NewCompetitorRate], pool: &PgPool) -> Result<Vec<Self>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO competitor_rates \
             (business_id, competitor_name, competitor_url, room_type, rate, availability, date, metadata) ",
        );

        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.business_id)
                .push_bind(row.competitor_name.clone())
                .push_bind(row.competitor_url.clone())
                .push_bind(row.room_type.clone())
                .push_bind(row.rate)
                .push_bind(row.availability.map(|a| a.as_str()))
                .push_bind(row.date)
                .push_bind(Json(row.metadata.clone()));
        });
        builder.push(" RETURNING *");

        let inserted = builder
            .build_query_as::<Self>()
            .fetch_all(pool)
            .await?;

        tracing::debug!(
            business_id = %rows[0].business_id,
            competitor = %rows[0].competitor_name,
            rows = inserted.len(),
            "Inserted competitor rates"
        );

        Ok(inserted)
    }

    /// Most recent rows for a business, newest first.
    pub async fn recent_for_business(
        business_id: BusinessId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM competitor_rates
            WHERE business_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_business(business_id: BusinessId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competitor_rates WHERE business_id = $1")
            .bind(business_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}
