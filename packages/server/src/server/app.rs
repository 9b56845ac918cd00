//! Application setup and server configuration.

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    competitor_rates_handler, health_handler, scrape_competitor_rates_handler,
    store_pms_credentials_handler,
};

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    // Browser clients call from any origin with the hosted-database headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    let jwt_service = deps.jwt_service.clone();

    Router::new()
        .route("/scrape-competitor-rates", post(scrape_competitor_rates_handler))
        .route("/store-pms-credentials", post(store_pms_credentials_handler))
        .route(
            "/businesses/:business_id/competitor-rates",
            get(competitor_rates_handler),
        )
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(deps))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
