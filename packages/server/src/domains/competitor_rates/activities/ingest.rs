//! Competitor-rate ingestion.
//!
//! For each competitor, strictly in order: fetch the page, extract rates from
//! a bounded prefix of its content, store the resulting rows in one batch.
//! A failure at any stage is recorded against that competitor only; the
//! batch always runs to the end.

use ai_client::truncate_chars;
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

use crate::common::BusinessId;
use crate::domains::competitor_rates::models::{CompetitorRate, NewCompetitorRate, RateProvenance};
use crate::kernel::ServerDeps;

/// Characters of page content handed to the extractor.
pub const MAX_EXTRACTION_CHARS: usize = 4000;

pub const NO_CONTENT_MESSAGE: &str = "No content extracted";

/// A competitor to scrape, as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompetitorTarget {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CompetitorTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
        }
    }

    /// Lenient form of one request entry: anything that is not an object
    /// with string fields becomes an empty target, skipped by the batch.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Name and URL as given, when neither is blank.
    fn validated(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|s| !s.trim().is_empty())?;
        let url = self.url.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((name, url))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Fetch,
    EmptyContent,
    Store,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureStage::Fetch => "fetch",
            FailureStage::EmptyContent => "empty_content",
            FailureStage::Store => "store",
        })
    }
}

#[derive(Debug, Clone)]
pub enum CompetitorOutcome {
    Stored {
        competitor: String,
        rows: Vec<CompetitorRate>,
    },
    Failed {
        competitor: String,
        stage: FailureStage,
        message: String,
    },
}

impl CompetitorOutcome {
    pub fn competitor(&self) -> &str {
        match self {
            CompetitorOutcome::Stored { competitor, .. }
            | CompetitorOutcome::Failed { competitor, .. } => competitor,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompetitorOutcome::Stored { .. })
    }
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Targets received, including ones skipped as malformed
    pub requested: usize,
    /// One entry per well-formed target, in input order
    pub outcomes: Vec<CompetitorOutcome>,
}

/// Run the pipeline over `targets` for one business.
pub async fn ingest_competitor_rates(
    business_id: BusinessId,
    targets: Vec<CompetitorTarget>,
    deps: &ServerDeps,
) -> IngestReport {
    let requested = targets.len();
    let run_date = Utc::now().date_naive();

    info!(business_id = %business_id, competitors = requested, "Starting competitor rate ingestion");

    let outcomes = stream::iter(targets)
        .fold(Vec::with_capacity(requested), |mut outcomes, target| async move {
            match target.validated() {
                Some((name, url)) => {
                    outcomes.push(ingest_one(business_id, name, url, run_date, deps).await);
                }
                None => {
                    warn!(business_id = %business_id, competitor = ?target, "Skipping competitor without name or url");
                }
            }
            outcomes
        })
        .await;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        business_id = %business_id,
        processed = outcomes.len(),
        succeeded,
        "Competitor rate ingestion finished"
    );

    IngestReport {
        requested,
        outcomes,
    }
}

async fn ingest_one(
    business_id: BusinessId,
    name: &str,
    url: &str,
    run_date: NaiveDate,
    deps: &ServerDeps,
) -> CompetitorOutcome {
    let failed = |stage: FailureStage, message: String| CompetitorOutcome::Failed {
        competitor: name.to_string(),
        stage,
        message,
    };

    info!(competitor = %name, url = %url, "Fetching competitor page");

    let fetched = match deps.content_fetcher.fetch(url).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(competitor = %name, error = %e, "Competitor page fetch failed");
            return failed(FailureStage::Fetch, e.to_string());
        }
    };

    let Some(content) = fetched.into_text() else {
        warn!(competitor = %name, "Competitor page had no content");
        return failed(FailureStage::EmptyContent, NO_CONTENT_MESSAGE.to_string());
    };

    let rows = extract_rows(business_id, name, url, run_date, &content, deps).await;

    match deps.rate_store.insert_batch(&rows).await {
        Ok(rows) => {
            info!(competitor = %name, rates_found = rows.len(), "Stored competitor rates");
            CompetitorOutcome::Stored {
                competitor: name.to_string(),
                rows,
            }
        }
        Err(e) => {
            warn!(competitor = %name, error = %e, "Failed to store competitor rates");
            failed(FailureStage::Store, e.to_string())
        }
    }
}

/// Extracted rows, or a single manual-review row when extraction yields nothing.
async fn extract_rows(
    business_id: BusinessId,
    name: &str,
    url: &str,
    run_date: NaiveDate,
    content: &str,
    deps: &ServerDeps,
) -> Vec<NewCompetitorRate> {
    let scraped_at: DateTime<Utc> = Utc::now();
    let prefix = truncate_chars(content, MAX_EXTRACTION_CHARS);

    let fallback_reason = match &deps.rate_extractor {
        None => "rate extraction is not configured".to_string(),
        Some(extractor) => match extractor.extract_rates(prefix).await {
            Ok(items) if !items.is_empty() => {
                return items
                    .into_iter()
                    .map(|item| {
                        NewCompetitorRate::from_extracted(
                            business_id,
                            name,
                            url,
                            run_date,
                            scraped_at,
                            item,
                        )
                    })
                    .collect();
            }
            Ok(_) => "no rates found in content".to_string(),
            Err(e) => {
                warn!(competitor = %name, error = %e, "Rate extraction failed");
                e.to_string()
            }
        },
    };

    info!(competitor = %name, reason = %fallback_reason, "Recording competitor for manual review");

    vec![NewCompetitorRate::manual_review(
        business_id,
        name,
        url,
        run_date,
        RateProvenance::manual_review(scraped_at, content.chars().count(), Some(fallback_reason)),
    )]
}
