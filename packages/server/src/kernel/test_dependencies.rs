// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.
// Every mock is cheap to clone and clones share state, so a test can keep a
// handle to inspect calls after handing the mock over.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{
    BaseBusinessStore, BaseContentFetcher, BaseEncryption, BaseRateExtractor, BaseRateStore,
    FetchedContent, ServerDeps,
};
use crate::common::{
    AppRole, BusinessAccess, BusinessId, CompetitorRateId, ExtractedRate, SecretString, UserId,
};
use crate::domains::auth::JwtService;
use crate::domains::businesses::models::{CredentialUpdate, PmsSystem};
use crate::domains::competitor_rates::models::{CompetitorRate, NewCompetitorRate};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_JWT_ISSUER: &str = "supabase";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Mock Content Fetcher
// =============================================================================

#[derive(Clone, Default)]
pub struct MockContentFetcher {
    responses: Arc<Mutex<HashMap<String, Result<FetchedContent, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markdown(self, url: &str, markdown: &str) -> Self {
        self.with_content(url, FetchedContent::markdown(markdown))
    }

    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_content(
            url,
            FetchedContent {
                markdown: None,
                html: Some(html.to_string()),
            },
        )
    }

    pub fn with_content(self, url: &str, content: FetchedContent) -> Self {
        lock(&self.responses).insert(url.to_string(), Ok(content));
        self
    }

    /// Make fetches of `url` fail with `message`
    pub fn with_error(self, url: &str, message: &str) -> Self {
        lock(&self.responses).insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// URLs fetched, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl BaseContentFetcher for MockContentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedContent> {
        lock(&self.calls).push(url.to_string());

        match lock(&self.responses).get(url) {
            Some(Ok(content)) => Ok(content.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => Err(anyhow::anyhow!("Firecrawl API error: 404")),
        }
    }
}

// =============================================================================
// Mock Rate Extractor
// =============================================================================

#[derive(Clone, Default)]
pub struct MockRateExtractor {
    response: Arc<Mutex<Option<Result<Vec<ExtractedRate>, String>>>>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockRateExtractor {
    /// Extractor that finds nothing until told otherwise
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(self, rates: Vec<ExtractedRate>) -> Self {
        *lock(&self.response) = Some(Ok(rates));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        *lock(&self.response) = Some(Err(message.to_string()));
        self
    }

    /// Content passed to each extraction call
    pub fn inputs(&self) -> Vec<String> {
        lock(&self.inputs).clone()
    }
}

#[async_trait]
impl BaseRateExtractor for MockRateExtractor {
    async fn extract_rates(&self, content: &str) -> Result<Vec<ExtractedRate>> {
        lock(&self.inputs).push(content.to_string());

        match lock(&self.response).clone() {
            Some(Ok(rates)) => Ok(rates),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(Vec::new()),
        }
    }
}

// =============================================================================
// In-memory Rate Store
// =============================================================================

#[derive(Clone, Default)]
pub struct InMemoryRateStore {
    rows: Arc<Mutex<Vec<CompetitorRate>>>,
    failure: Option<String>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose inserts always fail with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            rows: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn rows_for(&self, business_id: BusinessId) -> Vec<CompetitorRate> {
        lock(&self.rows)
            .iter()
            .filter(|row| row.business_id == business_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseRateStore for InMemoryRateStore {
    async fn insert_batch(&self, rows: &[NewCompetitorRate]) -> Result<Vec<CompetitorRate>> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }

        let created_at = Utc::now();
        let stored: Vec<CompetitorRate> = rows
            .iter()
            .map(|row| CompetitorRate {
                id: CompetitorRateId::new(),
                business_id: row.business_id,
                competitor_name: row.competitor_name.clone(),
                competitor_url: row.competitor_url.clone(),
                room_type: row.room_type.clone(),
                rate: row.rate,
                availability: row.availability.map(|a| a.to_string()),
                date: row.date,
                metadata: Json(row.metadata.clone()),
                created_at,
            })
            .collect();

        lock(&self.rows).extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn recent_for_business(
        &self,
        business_id: BusinessId,
        limit: i64,
    ) -> Result<Vec<CompetitorRate>> {
        let mut rows = self.rows_for(business_id);
        // Stable sort keeps insertion order among equal timestamps
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }
}

// =============================================================================
// In-memory Business Store
// =============================================================================

/// Credential columns of one business
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRecord {
    pub owner_id: Option<UserId>,
    pub pms_system: PmsSystem,
    pub pms_api_key: Option<String>,
    pub pms_api_key_encrypted: Option<String>,
    pub pms_credentials: Option<serde_json::Value>,
    pub pms_credentials_encrypted: Option<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryBusinessStore {
    businesses: Arc<Mutex<HashMap<BusinessId, BusinessRecord>>>,
    roles: Arc<Mutex<Vec<(UserId, BusinessId, AppRole)>>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemoryBusinessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_business(&self, owner_id: Option<UserId>) -> BusinessId {
        self.insert(BusinessRecord {
            owner_id,
            pms_system: PmsSystem::None,
            pms_api_key: None,
            pms_api_key_encrypted: None,
            pms_credentials: None,
            pms_credentials_encrypted: None,
        })
    }

    /// Business still holding legacy plaintext credentials
    pub fn add_business_with_plaintext(&self, owner_id: Option<UserId>) -> BusinessId {
        self.insert(BusinessRecord {
            owner_id,
            pms_system: PmsSystem::Opera,
            pms_api_key: Some("legacy-plaintext-key".to_string()),
            pms_api_key_encrypted: None,
            pms_credentials: Some(serde_json::json!({ "hotel_code": "LEGACY" })),
            pms_credentials_encrypted: None,
        })
    }

    fn insert(&self, record: BusinessRecord) -> BusinessId {
        let id = BusinessId::new();
        lock(&self.businesses).insert(id, record);
        id
    }

    pub fn grant_role(&self, user_id: UserId, business_id: BusinessId, role: AppRole) {
        lock(&self.roles).push((user_id, business_id, role));
    }

    pub fn record(&self, business_id: BusinessId) -> Option<BusinessRecord> {
        lock(&self.businesses).get(&business_id).cloned()
    }

    /// Number of credential writes performed
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

#[async_trait]
impl BaseBusinessStore for InMemoryBusinessStore {
    async fn access_for(&self, user_id: UserId, business_id: BusinessId) -> Result<BusinessAccess> {
        let owns = lock(&self.businesses)
            .get(&business_id)
            .is_some_and(|b| b.owner_id == Some(user_id));

        let roles = lock(&self.roles)
            .iter()
            .filter(|(user, business, _)| *user == user_id && *business == business_id)
            .map(|(_, _, role)| *role)
            .collect();

        Ok(BusinessAccess { owns, roles })
    }

    async fn write_credentials(
        &self,
        business_id: BusinessId,
        update: &CredentialUpdate,
    ) -> Result<()> {
        let mut businesses = lock(&self.businesses);
        let record = businesses
            .get_mut(&business_id)
            .ok_or_else(|| anyhow::anyhow!("Business {} not found", business_id))?;

        record.pms_api_key_encrypted = update.pms_api_key_encrypted.clone();
        record.pms_credentials_encrypted = update.pms_credentials_encrypted.clone();
        record.pms_api_key = None;
        record.pms_credentials = None;
        if let Some(system) = update.pms_system {
            record.pms_system = system;
        }

        *lock(&self.writes) += 1;
        Ok(())
    }
}

// =============================================================================
// Mock Encryption
// =============================================================================

#[derive(Clone, Default)]
pub struct MockEncryption {
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEncryption {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plaintexts handed to `encrypt`, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl BaseEncryption for MockEncryption {
    async fn encrypt(&self, plaintext: &str, key: &SecretString) -> Result<String> {
        lock(&self.calls).push(plaintext.to_string());
        let scrambled: String = plaintext.chars().rev().collect();
        Ok(format!("enc:{}:{}", key.expose().len(), scrambled))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub content_fetcher: Arc<MockContentFetcher>,
    pub rate_extractor: Option<Arc<MockRateExtractor>>,
    pub rate_store: Arc<InMemoryRateStore>,
    pub business_store: Arc<InMemoryBusinessStore>,
    pub encryption: Arc<MockEncryption>,
    pub jwt_service: Arc<JwtService>,
    pub pms_encryption_key: Option<SecretString>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            content_fetcher: Arc::new(MockContentFetcher::new()),
            rate_extractor: None,
            rate_store: Arc::new(InMemoryRateStore::new()),
            business_store: Arc::new(InMemoryBusinessStore::new()),
            encryption: Arc::new(MockEncryption::new()),
            jwt_service: Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            pms_encryption_key: None,
        }
    }

    /// Set a mock content fetcher
    pub fn mock_fetcher(mut self, fetcher: MockContentFetcher) -> Self {
        self.content_fetcher = Arc::new(fetcher);
        self
    }

    /// Set a mock rate extractor (none by default, as with no gateway key)
    pub fn mock_extractor(mut self, extractor: MockRateExtractor) -> Self {
        self.rate_extractor = Some(Arc::new(extractor));
        self
    }

    pub fn mock_rate_store(mut self, store: InMemoryRateStore) -> Self {
        self.rate_store = Arc::new(store);
        self
    }

    pub fn mock_business_store(mut self, store: InMemoryBusinessStore) -> Self {
        self.business_store = Arc::new(store);
        self
    }

    pub fn mock_encryption(mut self, encryption: MockEncryption) -> Self {
        self.encryption = Arc::new(encryption);
        self
    }

    pub fn with_encryption_key(mut self, key: &str) -> Self {
        self.pms_encryption_key = Some(SecretString::from(key));
        self
    }

    /// Bearer token for `user_id`, signed with the test secret
    pub fn token_for(&self, user_id: UserId) -> Result<String> {
        self.jwt_service.create_token(user_id, None)
    }

    /// Build ServerDeps around the mocks
    ///
    /// The pool never connects; anything that touches it directly fails fast.
    pub fn server_deps(&self) -> ServerDeps {
        let rate_extractor = self
            .rate_extractor
            .clone()
            .map(|extractor| extractor as Arc<dyn BaseRateExtractor>);

        ServerDeps::new(
            unreachable_pool(),
            self.content_fetcher.clone(),
            rate_extractor,
            self.rate_store.clone(),
            self.business_store.clone(),
            self.encryption.clone(),
            self.jwt_service.clone(),
            self.pms_encryption_key.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy pool pointed at a closed port
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy_with(PgConnectOptions::new().host("127.0.0.1").port(9))
}
