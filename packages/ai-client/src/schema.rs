//! JSON schema generation for tool parameters.
//!
//! Gateways in front of non-OpenAI models are inconsistent about following
//! `$ref`, so every subschema is inlined and the draft metadata is dropped.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;

/// Generate a self-contained parameters schema for `T`.
pub fn parameters_schema<T: JsonSchema>() -> serde_json::Value {
    let generator = SchemaSettings::draft07()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator();

    let root = generator.into_root_schema_for::<T>();
    let mut value = serde_json::to_value(root).unwrap_or_default();

    if let serde_json::Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("title");
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "snake_case")]
    #[allow(dead_code)]
    enum Level {
        Low,
        VeryHigh,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Reading {
        label: String,
        level: Level,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Readings {
        readings: Vec<Reading>,
    }

    #[test]
    fn test_nested_types_are_inlined() {
        let schema = parameters_schema::<Readings>();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("$ref"));
        assert!(!text.contains("$schema"));
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["readings"]["type"], "array");
    }

    #[test]
    fn test_enum_variants_listed() {
        let schema = parameters_schema::<Readings>();
        let level = &schema["properties"]["readings"]["items"]["properties"]["level"];
        let variants: Vec<&str> = level["enum"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert_eq!(variants, vec!["low", "very_high"]);
    }

    #[test]
    fn test_required_fields() {
        let schema = parameters_schema::<Readings>();
        let item = &schema["properties"]["readings"]["items"];
        let required = item["required"].as_array().unwrap();

        assert!(required.iter().any(|v| v == "label"));
        assert!(required.iter().any(|v| v == "level"));
    }
}
