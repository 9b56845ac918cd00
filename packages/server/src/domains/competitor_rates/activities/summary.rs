//! Dashboard view over stored rates: latest row per competitor and the
//! market average across those rows.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::common::BusinessId;
use crate::domains::competitor_rates::models::CompetitorRate;
use crate::kernel::ServerDeps;

/// How many rows the dashboard pulls.
pub const RECENT_RATES_LIMIT: i64 = 50;

#[derive(Debug, Clone)]
pub struct RateSummary {
    /// One row per competitor, in first-seen order
    pub latest: Vec<CompetitorRate>,
    /// Mean of the latest rates that are present and positive
    pub average_rate: Option<Decimal>,
}

pub async fn recent_rates(
    business_id: BusinessId,
    deps: &ServerDeps,
) -> anyhow::Result<Vec<CompetitorRate>> {
    deps.rate_store
        .recent_for_business(business_id, RECENT_RATES_LIMIT)
        .await
}

/// Latest row per competitor by `created_at`. Ties keep the row seen first.
pub fn summarize(rates: &[CompetitorRate]) -> RateSummary {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<&CompetitorRate> = Vec::new();

    for rate in rates {
        match index.get(rate.competitor_name.as_str()) {
            Some(&slot) => {
                if rate.created_at > latest[slot].created_at {
                    latest[slot] = rate;
                }
            }
            None => {
                index.insert(rate.competitor_name.as_str(), latest.len());
                latest.push(rate);
            }
        }
    }

    let priced: Vec<Decimal> = latest
        .iter()
        .filter_map(|rate| rate.rate)
        .filter(|rate| *rate > Decimal::ZERO)
        .collect();

    let average_rate = if priced.is_empty() {
        None
    } else {
        let total: Decimal = priced.iter().sum();
        Some((total / Decimal::from(priced.len())).round_dp(2))
    };

    RateSummary {
        latest: latest.into_iter().cloned().collect(),
        average_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::competitor_rates::models::RateProvenance;
    use chrono::{DateTime, Duration, Utc};
    use sqlx::types::Json;

    fn row(name: &str, rate: Option<i64>, created_at: DateTime<Utc>) -> CompetitorRate {
        CompetitorRate {
            id: Default::default(),
            business_id: Default::default(),
            competitor_name: name.to_string(),
            competitor_url: format!("https://{}.example", name.to_lowercase()),
            room_type: rate.map(|_| "Standard".to_string()),
            rate: rate.map(Decimal::from),
            availability: None,
            date: created_at.date_naive(),
            metadata: Json(RateProvenance::extracted(created_at)),
            created_at,
        }
    }

    #[test]
    fn test_latest_per_competitor() {
        let now = Utc::now();
        let rates = vec![
            row("Acme", Some(130), now),
            row("Birch", Some(90), now - Duration::hours(1)),
            row("Acme", Some(120), now - Duration::days(1)),
        ];

        let summary = summarize(&rates);
        assert_eq!(summary.latest.len(), 2);
        assert_eq!(summary.latest[0].competitor_name, "Acme");
        assert_eq!(summary.latest[0].rate, Some(Decimal::from(130)));
        assert_eq!(summary.average_rate, Some(Decimal::from(110)));
    }

    #[test]
    fn test_newer_row_later_in_list_wins() {
        let now = Utc::now();
        let rates = vec![
            row("Acme", Some(120), now - Duration::days(1)),
            row("Acme", Some(140), now),
        ];

        let summary = summarize(&rates);
        assert_eq!(summary.latest.len(), 1);
        assert_eq!(summary.latest[0].rate, Some(Decimal::from(140)));
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let now = Utc::now();
        let rates = vec![row("Acme", Some(100), now), row("Acme", Some(200), now)];

        let summary = summarize(&rates);
        assert_eq!(summary.latest[0].rate, Some(Decimal::from(100)));
    }

    #[test]
    fn test_average_ignores_missing_and_zero_rates() {
        let now = Utc::now();
        let rates = vec![
            row("Acme", None, now),
            row("Birch", Some(0), now),
            row("Cedar", Some(99), now),
        ];

        let summary = summarize(&rates);
        assert_eq!(summary.latest.len(), 3);
        assert_eq!(summary.average_rate, Some(Decimal::from(99)));
    }

    #[test]
    fn test_empty() {
        let summary = summarize(&[]);
        assert!(summary.latest.is_empty());
        assert!(summary.average_rate.is_none());
    }
}
