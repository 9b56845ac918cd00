//! Rate ingestion and rate query over HTTP, against in-memory dependencies.

mod common;

use crate::common::{get, post_json, send};
use axum::http::{Method, StatusCode};
use serde_json::json;
use server_core::common::{AppRole, Availability, BusinessId, ExtractedRate, UserId};
use server_core::kernel::test_dependencies::{
    InMemoryBusinessStore, MockContentFetcher, MockRateExtractor,
};
use server_core::kernel::TestDependencies;
use server_core::server::build_app;

const ACME_URL: &str = "https://acme.example/rates";

fn acme_standard() -> Vec<ExtractedRate> {
    vec![ExtractedRate {
        room_type: "Standard".into(),
        rate: 120.0,
        availability: Availability::Available,
    }]
}

// ============================================================================
// POST /scrape-competitor-rates
// ============================================================================

#[tokio::test]
async fn scrape_acme_inn_success() {
    let deps = TestDependencies::new()
        .mock_fetcher(MockContentFetcher::new().with_markdown(ACME_URL, "Standard room $120 per night"))
        .mock_extractor(MockRateExtractor::new().with_rates(acme_standard()));
    let business = BusinessId::new();

    let response = post_json(
        build_app(deps.server_deps()),
        "/scrape-competitor-rates",
        None,
        json!({
            "business_id": business.to_string(),
            "competitors": [{ "name": "Acme Inn", "url": ACME_URL }]
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Processed 1 competitors");

    let result = &response.body["results"][0];
    assert_eq!(result["competitor"], "Acme Inn");
    assert_eq!(result["success"], true);
    assert_eq!(result["rates_found"], 1);
    assert_eq!(result["data"][0]["rate"], json!(120.0));
    assert_eq!(result["data"][0]["availability"], "available");
    assert_eq!(result["data"][0]["metadata"]["kind"], "extracted");
    assert_eq!(result["data"][0]["metadata"]["source"], "firecrawl");

    let rows = deps.rate_store.rows_for(business);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].competitor_name, "Acme Inn");
}

#[tokio::test]
async fn scrape_acme_inn_not_found() {
    let deps = TestDependencies::new()
        .mock_fetcher(MockContentFetcher::new().with_error(ACME_URL, "Firecrawl API error: 404"))
        .mock_extractor(MockRateExtractor::new().with_rates(acme_standard()));
    let business = BusinessId::new();

    let response = post_json(
        build_app(deps.server_deps()),
        "/scrape-competitor-rates",
        None,
        json!({
            "business_id": business.to_string(),
            "competitors": [{ "name": "Acme Inn", "url": ACME_URL }]
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["results"],
        json!([{ "competitor": "Acme Inn", "success": false, "error": "Firecrawl API error: 404" }])
    );
    assert!(deps.rate_store.rows_for(business).is_empty());
}

#[tokio::test]
async fn scrape_without_gateway_writes_manual_review_row() {
    let page = "Rooms from $99";
    let deps = TestDependencies::new()
        .mock_fetcher(MockContentFetcher::new().with_markdown(ACME_URL, page));
    let business = BusinessId::new();

    let response = post_json(
        build_app(deps.server_deps()),
        "/scrape-competitor-rates",
        None,
        json!({
            "business_id": business.to_string(),
            "competitors": [{ "name": "Acme Inn", "url": ACME_URL }]
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let row = &response.body["results"][0]["data"][0];
    assert_eq!(row["rate"], json!(null));
    assert_eq!(row["room_type"], json!(null));
    assert_eq!(row["metadata"]["kind"], "manual_review");
    assert_eq!(row["metadata"]["raw_content_length"], page.len());
    assert_eq!(
        row["metadata"]["note"],
        "Manual review needed - AI extraction unsuccessful"
    );
}

#[tokio::test]
async fn scrape_skips_malformed_targets_but_counts_them() {
    let deps = TestDependencies::new()
        .mock_fetcher(MockContentFetcher::new().with_markdown(ACME_URL, "Standard $120"))
        .mock_extractor(MockRateExtractor::new().with_rates(acme_standard()));

    let response = post_json(
        build_app(deps.server_deps()),
        "/scrape-competitor-rates",
        None,
        json!({
            "business_id": BusinessId::new().to_string(),
            "competitors": [
                { "name": "Nameless" },
                { "url": "https://nourl.example" },
                { "name": "Acme Inn", "url": ACME_URL }
            ]
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Processed 3 competitors");
    assert_eq!(response.body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn scrape_skips_entries_that_are_not_targets() {
    let deps = TestDependencies::new()
        .mock_fetcher(MockContentFetcher::new().with_markdown(ACME_URL, "Standard $120"))
        .mock_extractor(MockRateExtractor::new().with_rates(acme_standard()));
    let business = BusinessId::new();

    let response = post_json(
        build_app(deps.server_deps()),
        "/scrape-competitor-rates",
        None,
        json!({
            "business_id": business.to_string(),
            "competitors": [
                42,
                null,
                { "name": 7, "url": "https://seven.example" },
                { "name": "Acme Inn", "url": ACME_URL }
            ]
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Processed 4 competitors");
    assert_eq!(
        response.body["results"].as_array().unwrap().len(),
        1
    );
    assert_eq!(response.body["results"][0]["competitor"], "Acme Inn");
    assert_eq!(response.body["results"][0]["rates_found"], 1);
    assert_eq!(deps.content_fetcher.calls(), vec![ACME_URL.to_string()]);
    assert_eq!(deps.rate_store.rows_for(business).len(), 1);
}

#[tokio::test]
async fn scrape_rejects_missing_inputs() {
    let deps = TestDependencies::new();

    for body in [
        json!({ "competitors": [{ "name": "Acme Inn", "url": ACME_URL }] }),
        json!({ "business_id": BusinessId::new().to_string() }),
        json!({ "business_id": BusinessId::new().to_string(), "competitors": [] }),
        json!({ "business_id": BusinessId::new().to_string(), "competitors": "Acme Inn" }),
        json!({ "business_id": "not-a-uuid", "competitors": [{ "name": "Acme Inn", "url": ACME_URL }] }),
    ] {
        let response = post_json(
            build_app(deps.server_deps()),
            "/scrape-competitor-rates",
            None,
            body.clone(),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert!(response.body["error"].is_string(), "body: {}", body);
    }

    assert!(deps.content_fetcher.calls().is_empty());
}

#[tokio::test]
async fn scrape_preflight_allows_any_origin() {
    let deps = TestDependencies::new();

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/scrape-competitor-rates")
        .header("origin", "https://dashboard.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization, x-client-info, apikey, content-type")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(build_app(deps.server_deps()), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let allowed = response.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_lowercase();
    for header in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(header), "missing {}", header);
    }
}

// ============================================================================
// GET /businesses/:business_id/competitor-rates
// ============================================================================

async fn seeded_rates(deps: &TestDependencies, business: BusinessId) {
    let response = post_json(
        build_app(deps.server_deps()),
        "/scrape-competitor-rates",
        None,
        json!({
            "business_id": business.to_string(),
            "competitors": [
                { "name": "Acme Inn", "url": ACME_URL },
                { "name": "Birch Lodge", "url": "https://birch.example" }
            ]
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn rates_query_returns_rates_and_summary() {
    let store = InMemoryBusinessStore::new();
    let owner = UserId::new();
    let business = store.add_business(Some(owner));
    let deps = TestDependencies::new()
        .mock_business_store(store)
        .mock_fetcher(
            MockContentFetcher::new()
                .with_markdown(ACME_URL, "Standard $120")
                .with_markdown("https://birch.example", "Standard $120"),
        )
        .mock_extractor(MockRateExtractor::new().with_rates(acme_standard()));
    seeded_rates(&deps, business).await;

    let token = deps.token_for(owner).unwrap();
    let response = get(
        build_app(deps.server_deps()),
        &format!("/businesses/{}/competitor-rates", business),
        Some(&token),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rates"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["summary"]["latest"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["summary"]["average_rate"], json!(120.0));
}

#[tokio::test]
async fn rates_query_requires_access() {
    let store = InMemoryBusinessStore::new();
    let business = store.add_business(Some(UserId::new()));
    let auditor = UserId::new();
    store.grant_role(auditor, business, AppRole::Auditor);
    let deps = TestDependencies::new().mock_business_store(store);
    let uri = format!("/businesses/{}/competitor-rates", business);

    let response = get(build_app(deps.server_deps()), &uri, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Unauthorized");

    let response = get(build_app(deps.server_deps()), &uri, Some("garbage")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid token");

    let token = deps.token_for(auditor).unwrap();
    let response = get(build_app(deps.server_deps()), &uri, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "Access denied to business");
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let deps = TestDependencies::new();

    let response = send(
        build_app(deps.server_deps()),
        Method::GET,
        "/health",
        None,
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
    assert_eq!(response.body["database"]["status"], "error");
}
