//! JSON Schema validation for simregress configuration files

use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

/// Get the embedded JSON schema for simregress configuration
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/config.schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {e}"))?;

    jsonschema::draft7::new(&schema).map_err(|e| anyhow!("Failed to compile JSON schema: {e}"))
}

/// Validate a configuration document against the schema
pub fn validate_against_schema(document: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(document)
        .map(|e| format!("  - {e}"))
        .collect();

    if !error_messages.is_empty() {
        return Err(anyhow!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n")
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_schema_compiles() {
        get_schema().unwrap();
    }

    #[test]
    fn accepts_known_keys() {
        let document = json!({
            "refs-path": "refs/BCH",
            "max-fe": 50,
            "weak-rate": 0.5,
            "extensions": ["txt"]
        });
        validate_against_schema(&document).unwrap();
    }

    #[test]
    fn rejects_unknown_keys_and_ranges() {
        let unknown = json!({ "refs": "refs" });
        assert!(validate_against_schema(&unknown).is_err());

        let out_of_range = json!({ "weak-rate": 1.5 });
        let err = validate_against_schema(&out_of_range).unwrap_err();
        assert!(err.to_string().contains("Configuration validation failed"));

        let negative = json!({ "max-fe": -1 });
        assert!(validate_against_schema(&negative).is_err());
    }
}
