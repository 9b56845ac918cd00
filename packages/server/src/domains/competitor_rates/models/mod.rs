pub mod competitor_rate;

pub use competitor_rate::{
    to_money, CompetitorRate, MAX_RATE, NewCompetitorRate, RateProvenance, MANUAL_REVIEW_NOTE,
    SOURCE_FIRECRAWL,
};
