pub mod ingest;
pub mod summary;

pub use ingest::{
    ingest_competitor_rates, CompetitorOutcome, CompetitorTarget, FailureStage, IngestReport,
};
pub use summary::{recent_rates, summarize, RateSummary, RECENT_RATES_LIMIT};
