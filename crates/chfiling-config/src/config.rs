use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Message class used for accounts submissions unless `class` overrides it.
pub const DEFAULT_ACCOUNTS_CLASS: &str = "Accounts";

/// Presenter configuration, read once per session and immutable thereafter.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Presenter identity registered with the gateway.
    pub presenter_id: String,
    /// Presenter authentication secret. Redacted in debug output.
    pub authentication: String,
    /// Company the session files for.
    pub company_number: String,
    /// Accounts reference date.
    pub made_up_date: NaiveDate,
    /// Gateway endpoint URL.
    pub url: String,
    /// Form identifier override for accounts submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Route messages to the gateway's test service.
    #[serde(default, alias = "test-flag", deserialize_with = "deserialize_flag")]
    pub gateway_test: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Company authentication code. Redacted in debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_authentication_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_signed: Option<String>,
}

impl Config {
    /// Build a config from the required keys, leaving optional ones unset.
    pub fn new(
        presenter_id: impl Into<String>,
        authentication: impl Into<String>,
        company_number: impl Into<String>,
        made_up_date: NaiveDate,
        url: impl Into<String>,
    ) -> Self {
        Self {
            presenter_id: presenter_id.into(),
            authentication: authentication.into(),
            company_number: company_number.into(),
            made_up_date,
            url: url.into(),
            class: None,
            gateway_test: false,
            company_type: None,
            company_name: None,
            company_authentication_code: None,
            package_reference: None,
            contact_name: None,
            contact_number: None,
            email: None,
            date_signed: None,
        }
    }

    /// Reject required fields that are present but blank.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("presenter-id", &self.presenter_id),
            ("authentication", &self.authentication),
            ("company-number", &self.company_number),
            ("url", &self.url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(name));
            }
        }
        Ok(())
    }

    /// Form identifier and message class for accounts submissions.
    pub fn accounts_class(&self) -> &str {
        self.class.as_deref().unwrap_or(DEFAULT_ACCOUNTS_CLASS)
    }

    /// Made-up date in the gateway's `YYYY-MM-DD` form.
    pub fn made_up_date_string(&self) -> String {
        self.made_up_date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("presenter_id", &self.presenter_id)
            .field(
                "authentication",
                &format_args!("<redacted:{} bytes>", self.authentication.len()),
            )
            .field("company_number", &self.company_number)
            .field("made_up_date", &self.made_up_date)
            .field("url", &self.url)
            .field("class", &self.class)
            .field("gateway_test", &self.gateway_test)
            .field("company_type", &self.company_type)
            .field(
                "company_authentication_code",
                &self.company_authentication_code.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

// Older config files spell the flag as 0/1 or "0"/"1".
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(serde::de::Error::custom(format!(
                "gateway-test must be 0 or 1, got {n}"
            ))),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "gateway-test must be a boolean, got {other:?}"
            ))),
        },
        Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "gateway-test must be a boolean, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config::new(
            "66666959263",
            "s3cret",
            "OC000001",
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            "https://xmlgw.companieshouse.gov.uk/v1-0/xmlgw/Gateway",
        )
    }

    #[test]
    fn validate_rejects_blank_presenter() {
        let mut config = sample();
        config.presenter_id = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyField("presenter-id"))
        ));
    }

    #[test]
    fn accounts_class_defaults_and_overrides() {
        let mut config = sample();
        assert_eq!(config.accounts_class(), "Accounts");
        config.class = Some("AccountsSmall".to_string());
        assert_eq!(config.accounts_class(), "AccountsSmall");
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = sample();
        config.company_authentication_code = Some("ABC123".to_string());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("ABC123"));
        assert!(rendered.contains("<redacted:6 bytes>"));
    }

    #[test]
    fn gateway_test_accepts_legacy_spellings() {
        for (raw, expected) in [("true", true), ("1", true), ("\"1\"", true), ("0", false)] {
            let json = format!(
                r#"{{"presenter-id":"p","authentication":"a","company-number":"c",
                    "made-up-date":"2024-03-31","url":"u","test-flag":{raw}}}"#
            );
            let config: Config = serde_json::from_str(&json).unwrap();
            assert_eq!(config.gateway_test, expected, "raw value {raw}");
        }
    }

    #[test]
    fn made_up_date_formats_iso() {
        assert_eq!(sample().made_up_date_string(), "2024-03-31");
    }
}
