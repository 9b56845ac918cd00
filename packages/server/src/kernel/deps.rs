//! Server dependencies for domain activities (using traits for testability)
//!
//! This module provides the central dependency container used by the ingestion
//! pipeline, the credential vault and the HTTP layer. All external services use
//! trait abstractions to enable testing.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;

use ai_client::AiClient;

use crate::common::SecretString;
use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{
    BaseBusinessStore, BaseContentFetcher, BaseEncryption, BaseRateExtractor, BaseRateStore,
    FirecrawlClient, GatewayRateExtractor, PgEncryption, PostgresBusinessStore,
    PostgresRateStore,
};

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities and handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub content_fetcher: Arc<dyn BaseContentFetcher>,
    /// None when no gateway key is configured; every page then goes to manual review
    pub rate_extractor: Option<Arc<dyn BaseRateExtractor>>,
    pub rate_store: Arc<dyn BaseRateStore>,
    pub business_store: Arc<dyn BaseBusinessStore>,
    pub encryption: Arc<dyn BaseEncryption>,
    /// JWT service for bearer verification
    pub jwt_service: Arc<JwtService>,
    pub pms_encryption_key: Option<SecretString>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: PgPool,
        content_fetcher: Arc<dyn BaseContentFetcher>,
        rate_extractor: Option<Arc<dyn BaseRateExtractor>>,
        rate_store: Arc<dyn BaseRateStore>,
        business_store: Arc<dyn BaseBusinessStore>,
        encryption: Arc<dyn BaseEncryption>,
        jwt_service: Arc<JwtService>,
        pms_encryption_key: Option<SecretString>,
    ) -> Self {
        Self {
            db_pool,
            content_fetcher,
            rate_extractor,
            rate_store,
            business_store,
            encryption,
            jwt_service,
            pms_encryption_key,
        }
    }

    /// Wire production implementations from configuration
    pub fn from_config(config: &Config, db_pool: PgPool) -> Result<Self> {
        let content_fetcher = FirecrawlClient::new(
            config.firecrawl_api_key.clone(),
            config.firecrawl_base_url.clone(),
        )
        .context("Failed to create Firecrawl client")?;

        let rate_extractor = match &config.ai_gateway_api_key {
            Some(api_key) => {
                let client =
                    AiClient::new(api_key.clone()).with_base_url(config.ai_gateway_base_url.clone());
                let extractor: Arc<dyn BaseRateExtractor> = Arc::new(GatewayRateExtractor::new(
                    client,
                    config.ai_extraction_model.clone(),
                ));
                Some(extractor)
            }
            None => {
                tracing::warn!("AI_GATEWAY_API_KEY not set; scraped pages will be queued for manual review");
                None
            }
        };

        if config.pms_encryption_key.is_none() {
            tracing::warn!("PMS_ENCRYPTION_KEY not set; credential storage is disabled");
        }

        Ok(Self::new(
            db_pool.clone(),
            Arc::new(content_fetcher),
            rate_extractor,
            Arc::new(PostgresRateStore::new(db_pool.clone())),
            Arc::new(PostgresBusinessStore::new(db_pool.clone())),
            Arc::new(PgEncryption::new(db_pool)),
            Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())),
            config.pms_encryption_key.clone(),
        ))
    }
}
