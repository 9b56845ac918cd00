use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BaseContentFetcher, FetchedContent};

/// Firecrawl scrape API client implementing BaseContentFetcher
pub struct FirecrawlClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Firecrawl output formats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum ScrapeFormat {
    Markdown,
    Html,
}

/// Firecrawl scrape request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<ScrapeFormat>,
    only_main_content: bool,
}

/// Firecrawl scrape response
#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    html: Option<String>,
}

impl FirecrawlClient {
    /// Create a new Firecrawl client against `base_url` (e.g. https://api.firecrawl.dev)
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&base_url).context("Invalid Firecrawl base URL")?;

        Ok(Self {
            api_key,
            base_url,
            client,
        })
    }
}

#[async_trait]
impl BaseContentFetcher for FirecrawlClient {
    async fn fetch(&self, url: &str) -> Result<FetchedContent> {
        let request = ScrapeRequest {
            url,
            formats: vec![ScrapeFormat::Markdown, ScrapeFormat::Html],
            only_main_content: true,
        };

        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send Firecrawl scrape request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(url = %url, status = %status, body = %body, "Firecrawl scrape rejected");
            anyhow::bail!("Firecrawl API error: {}", status.as_u16());
        }

        let scrape: ScrapeResponse = response
            .json()
            .await
            .context("Failed to parse Firecrawl response")?;

        Ok(scrape
            .data
            .map(|data| FetchedContent {
                markdown: data.markdown,
                html: data.html,
            })
            .unwrap_or_default())
    }
}
