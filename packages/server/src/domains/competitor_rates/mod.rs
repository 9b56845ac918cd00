pub mod activities;
pub mod data;
pub mod models;

pub use data::{CompetitorRatesData, CompetitorResultData, IngestResponseData, RateSummaryData};
pub use models::{CompetitorRate, NewCompetitorRate, RateProvenance};
