use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::common::{Actor, BusinessCapability, BusinessId};
use crate::domains::competitor_rates::activities::{
    ingest_competitor_rates, recent_rates, summarize, CompetitorTarget,
};
use crate::domains::competitor_rates::{CompetitorRatesData, IngestResponseData};
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::AuthContext;

const MISSING_INPUT: &str = "business_id and competitors array are required";

#[derive(Debug, Deserialize)]
pub struct ScrapeCompetitorRatesRequest {
    #[serde(default)]
    pub business_id: Option<String>,
    /// Entries are parsed one by one so a malformed entry is skipped, not fatal
    #[serde(default)]
    pub competitors: Option<Vec<Value>>,
}

impl ScrapeCompetitorRatesRequest {
    fn validate(self) -> Result<(BusinessId, Vec<CompetitorTarget>), ApiError> {
        let business_id = self
            .business_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_INPUT))?;
        let competitors = self
            .competitors
            .filter(|list| !list.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_INPUT))?;

        let business_id = BusinessId::parse(&business_id)
            .map_err(|_| ApiError::bad_request("business_id must be a UUID"))?;

        let competitors = competitors
            .into_iter()
            .map(CompetitorTarget::from_value)
            .collect();

        Ok((business_id, competitors))
    }
}

/// POST /scrape-competitor-rates
pub async fn scrape_competitor_rates_handler(
    Extension(deps): Extension<ServerDeps>,
    body: Result<Json<ScrapeCompetitorRatesRequest>, JsonRejection>,
) -> Result<Json<IngestResponseData>, ApiError> {
    let Json(request) = body?;
    let (business_id, competitors) = request.validate()?;

    let report = ingest_competitor_rates(business_id, competitors, &deps).await;

    Ok(Json(report.into()))
}

/// GET /businesses/:business_id/competitor-rates
pub async fn competitor_rates_handler(
    Extension(deps): Extension<ServerDeps>,
    auth: Option<Extension<AuthContext>>,
    Path(business_id): Path<String>,
) -> Result<Json<CompetitorRatesData>, ApiError> {
    let user_id = match auth {
        Some(Extension(context)) => context.user()?.user_id,
        None => return Err(ApiError::Unauthorized("Unauthorized".into())),
    };
    let business_id = BusinessId::parse(&business_id)
        .map_err(|_| ApiError::bad_request("business_id must be a UUID"))?;

    Actor::new(user_id)
        .can(BusinessCapability::ViewRates)
        .on(business_id)
        .check(deps.business_store.as_ref())
        .await?;

    let rates = recent_rates(business_id, &deps).await?;
    let summary = summarize(&rates);

    Ok(Json(CompetitorRatesData {
        rates,
        summary: summary.into(),
    }))
}
