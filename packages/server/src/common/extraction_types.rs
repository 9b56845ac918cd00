//! Shapes shared between the rate extractor and the rate store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Room availability as reported on a competitor's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    SoldOut,
    Limited,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::SoldOut => "sold_out",
            Availability::Limited => "limited",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Availability::Available),
            "sold_out" => Ok(Availability::SoldOut),
            "limited" => Ok(Availability::Limited),
            other => Err(format!("unknown availability: {}", other)),
        }
    }
}

/// One rate item as the extractor's tool call returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedRate {
    /// Room name as shown on the page, e.g. "Deluxe King"
    pub room_type: String,
    /// Nightly rate, numeric value only
    pub rate: f64,
    pub availability: Availability,
}

/// Arguments of the `extract_rates` tool call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractRatesArgs {
    pub rates: Vec<ExtractedRate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_wire_names() {
        assert_eq!(
            serde_json::to_value(Availability::SoldOut).unwrap(),
            serde_json::json!("sold_out")
        );
        assert_eq!("limited".parse::<Availability>(), Ok(Availability::Limited));
        assert!("unknown".parse::<Availability>().is_err());
    }

    #[test]
    fn test_tool_arguments_parse() {
        let args: ExtractRatesArgs = serde_json::from_str(
            r#"{"rates":[{"room_type":"Standard","rate":120,"availability":"available"}]}"#,
        )
        .unwrap();

        assert_eq!(args.rates.len(), 1);
        assert_eq!(args.rates[0].rate, 120.0);
        assert_eq!(args.rates[0].availability, Availability::Available);
    }
}
