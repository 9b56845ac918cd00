// Rate extraction over an OpenAI-compatible gateway
//
// Infrastructure implementation of BaseRateExtractor. The prompt and tool
// contract live here; what happens with an empty result is the pipeline's call.

use anyhow::Result;
use async_trait::async_trait;

use ai_client::{AiClient, Message, ToolDefinition};

use super::BaseRateExtractor;
use crate::common::{ExtractRatesArgs, ExtractedRate};

pub const EXTRACT_RATES_TOOL: &str = "extract_rates";

const SYSTEM_PROMPT: &str = "You are a hotel pricing data extraction expert. \
Extract room rates, room types, and availability from scraped hotel or OTA website content. \
Report each room with its room_type, rate (numeric value only), and availability status.";

/// Gateway-backed rate extractor with a forced `extract_rates` tool call
pub struct GatewayRateExtractor {
    client: AiClient,
    model: String,
    tool: ToolDefinition,
}

impl GatewayRateExtractor {
    pub fn new(client: AiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            tool: extract_rates_tool(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Tool contract: `{ rates: [{ room_type, rate, availability }] }`
pub fn extract_rates_tool() -> ToolDefinition {
    ToolDefinition::for_args::<ExtractRatesArgs>(
        EXTRACT_RATES_TOOL,
        "Extract hotel room rates from website content",
    )
}

fn user_prompt(content: &str) -> String {
    format!(
        "Extract hotel room pricing data from this content:\n\n{}",
        content
    )
}

#[async_trait]
impl BaseRateExtractor for GatewayRateExtractor {
    async fn extract_rates(&self, content: &str) -> Result<Vec<ExtractedRate>> {
        let args: ExtractRatesArgs = self
            .client
            .call_tool(
                &self.model,
                vec![Message::system(SYSTEM_PROMPT), Message::user(user_prompt(content))],
                &self.tool,
            )
            .await?;

        tracing::debug!(model = %self.model, rates = args.rates.len(), "Extracted rates");

        Ok(args.rates)
    }
}
