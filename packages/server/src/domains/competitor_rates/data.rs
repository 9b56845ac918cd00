use rust_decimal::Decimal;
use serde::Serialize;

use crate::domains::competitor_rates::activities::{CompetitorOutcome, IngestReport, RateSummary};
use crate::domains::competitor_rates::models::CompetitorRate;

/// Per-competitor entry of the ingestion response
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorResultData {
    pub competitor: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<CompetitorRate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<CompetitorOutcome> for CompetitorResultData {
    fn from(outcome: CompetitorOutcome) -> Self {
        match outcome {
            CompetitorOutcome::Stored { competitor, rows } => Self {
                competitor,
                success: true,
                rates_found: Some(rows.len()),
                data: Some(rows),
                error: None,
            },
            CompetitorOutcome::Failed {
                competitor, message, ..
            } => Self {
                competitor,
                success: false,
                rates_found: None,
                data: None,
                error: Some(message),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponseData {
    pub success: bool,
    pub message: String,
    pub results: Vec<CompetitorResultData>,
}

impl From<IngestReport> for IngestResponseData {
    fn from(report: IngestReport) -> Self {
        Self {
            success: true,
            message: format!("Processed {} competitors", report.requested),
            results: report.outcomes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RateSummaryData {
    pub latest: Vec<CompetitorRate>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_rate: Option<Decimal>,
}

impl From<RateSummary> for RateSummaryData {
    fn from(summary: RateSummary) -> Self {
        Self {
            latest: summary.latest,
            average_rate: summary.average_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitorRatesData {
    pub rates: Vec<CompetitorRate>,
    pub summary: RateSummaryData,
}
