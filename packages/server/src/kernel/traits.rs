// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The ingestion pipeline and the credential vault are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseContentFetcher, BaseRateStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{BusinessAccess, BusinessId, ExtractedRate, SecretString, UserId};
use crate::domains::businesses::models::CredentialUpdate;
use crate::domains::competitor_rates::models::{CompetitorRate, NewCompetitorRate};

// =============================================================================
// Content Fetcher Trait (Infrastructure - scraping service)
// =============================================================================

/// Page content as returned by the scraping service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedContent {
    pub markdown: Option<String>,
    pub html: Option<String>,
}

impl FetchedContent {
    pub fn markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: Some(markdown.into()),
            html: None,
        }
    }

    /// Markdown when non-empty, otherwise HTML when non-empty
    pub fn into_text(self) -> Option<String> {
        self.markdown
            .filter(|s| !s.is_empty())
            .or(self.html.filter(|s| !s.is_empty()))
    }
}

#[async_trait]
pub trait BaseContentFetcher: Send + Sync {
    /// Fetch the main content of a page as markdown and HTML
    async fn fetch(&self, url: &str) -> Result<FetchedContent>;
}

// =============================================================================
// Rate Extractor Trait (Infrastructure - LLM tool call)
// =============================================================================

#[async_trait]
pub trait BaseRateExtractor: Send + Sync {
    /// Extract room rates from page content
    ///
    /// An empty vec means the model found nothing; errors cover transport
    /// failures and a missing tool call.
    async fn extract_rates(&self, content: &str) -> Result<Vec<ExtractedRate>>;
}

// =============================================================================
// Rate Store Trait (Infrastructure - competitor_rates table)
// =============================================================================

#[async_trait]
pub trait BaseRateStore: Send + Sync {
    /// Insert all rows atomically, returning the stored rows
    async fn insert_batch(&self, rows: &[NewCompetitorRate]) -> Result<Vec<CompetitorRate>>;

    /// Most recent rows for a business, newest first
    async fn recent_for_business(
        &self,
        business_id: BusinessId,
        limit: i64,
    ) -> Result<Vec<CompetitorRate>>;
}

// =============================================================================
// Business Store Trait (Infrastructure - businesses + user_roles tables)
// =============================================================================

#[async_trait]
pub trait BaseBusinessStore: Send + Sync {
    /// Ownership and roles of `user_id` on `business_id`
    async fn access_for(&self, user_id: UserId, business_id: BusinessId) -> Result<BusinessAccess>;

    /// Overwrite the credential columns in a single-row update
    async fn write_credentials(&self, business_id: BusinessId, update: &CredentialUpdate)
        -> Result<()>;
}

// =============================================================================
// Encryption Trait (Infrastructure - database-side primitive)
// =============================================================================

#[async_trait]
pub trait BaseEncryption: Send + Sync {
    /// Encrypt `plaintext` with `key`, returning opaque ciphertext
    async fn encrypt(&self, plaintext: &str, key: &SecretString) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_preferred_over_html() {
        let content = FetchedContent {
            markdown: Some("# Rates".into()),
            html: Some("<h1>Rates</h1>".into()),
        };
        assert_eq!(content.into_text().as_deref(), Some("# Rates"));
    }

    #[test]
    fn test_empty_markdown_falls_back_to_html() {
        let content = FetchedContent {
            markdown: Some(String::new()),
            html: Some("<p>$120</p>".into()),
        };
        assert_eq!(content.into_text().as_deref(), Some("<p>$120</p>"));
    }

    #[test]
    fn test_nothing_fetched() {
        assert!(FetchedContent::default().into_text().is_none());
    }
}
