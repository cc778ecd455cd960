use jsonschema::Validator;
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::options::LoadOptions;

/// JSON Schema for the presenter config resource.
pub const CONFIG_SCHEMA: &str = r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "title": "chfiling presenter configuration",
    "type": "object",
    "properties": {
        "presenter-id": { "type": "string", "minLength": 1 },
        "authentication": { "type": "string", "minLength": 1 },
        "company-number": { "type": "string", "minLength": 1 },
        "made-up-date": { "type": "string", "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$" },
        "url": { "type": "string", "minLength": 1 },
        "class": { "type": "string", "minLength": 1 },
        "gateway-test": { "type": ["boolean", "integer", "string"] },
        "test-flag": { "type": ["boolean", "integer", "string"] },
        "company-type": { "type": "string" },
        "company-name": { "type": "string" },
        "company-authentication-code": { "type": "string" },
        "package-reference": { "type": "string" },
        "contact-name": { "type": "string" },
        "contact-number": { "type": "string" },
        "email": { "type": "string" },
        "date-signed": { "type": "string" }
    },
    "required": ["presenter-id", "authentication", "company-number", "made-up-date", "url"],
    "not": { "required": ["gateway-test", "test-flag"] }
}"#;

const CONFLICTING_TEST_FLAGS: &str =
    "gateway-test and its legacy alias test-flag are both set; keep only gateway-test";

/// Compiled validator for [`CONFIG_SCHEMA`].
pub struct ConfigValidator {
    validator: Validator,
}

impl ConfigValidator {
    /// Compile the embedded schema with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(&LoadOptions::default())
    }

    /// Compile the embedded schema, tightening it when `strict_mode` is set.
    pub fn with_options(options: &LoadOptions) -> Result<Self> {
        let mut schema: Value = serde_json::from_str(CONFIG_SCHEMA)?;
        if options.strict_mode {
            if let Value::Object(map) = &mut schema {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
        }

        let validator = jsonschema::validator_for(&schema)
            .map_err(|err| ConfigError::CompileFailed(err.to_string()))?;
        Ok(Self { validator })
    }

    /// Check a parsed config document, reporting up to four violations.
    pub fn validate(&self, document: &Value) -> Result<()> {
        // The schema rejects this too, but its message does not name the keys.
        if document.get("gateway-test").is_some() && document.get("test-flag").is_some() {
            return Err(ConfigError::Invalid(CONFLICTING_TEST_FLAGS.to_string()));
        }

        let mut errors = self.validator.iter_errors(document);
        if let Some(first) = errors.next() {
            let mut message = first.to_string();
            for err in errors.take(3) {
                message.push_str("; ");
                message.push_str(&err.to_string());
            }
            return Err(ConfigError::Invalid(message));
        }
        Ok(())
    }
}
