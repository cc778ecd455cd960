use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::options::LoadOptions;
use crate::schema::ConfigValidator;

/// Load and check a config file with default options.
pub fn from_path(path: &Path) -> Result<Config> {
    from_path_with_options(path, &LoadOptions::default())
}

/// Load and check a config file.
pub fn from_path_with_options(path: &Path, options: &LoadOptions) -> Result<Config> {
    let file = std::fs::File::open(path)
        .map_err(|err| ConfigError::LoadFailed(format!("{}: {err}", path.display())))?;
    let metadata = file
        .metadata()
        .map_err(|err| ConfigError::LoadFailed(format!("{}: {err}", path.display())))?;
    if !metadata.is_file() {
        return Err(ConfigError::LoadFailed(format!(
            "{}: not a regular file",
            path.display()
        )));
    }
    if metadata.len() > options.max_config_file_size as u64 {
        return Err(ConfigError::TooLarge {
            size: metadata.len(),
            max: options.max_config_file_size,
        });
    }

    let read_limit = u64::try_from(options.max_config_file_size.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| ConfigError::LoadFailed(format!("{}: {err}", path.display())))?;
    if content.len() > options.max_config_file_size {
        return Err(ConfigError::TooLarge {
            size: content.len() as u64,
            max: options.max_config_file_size,
        });
    }

    let config = from_str_with_options(&content, options)?;
    debug!(path = %path.display(), company = %config.company_number, "loaded config");
    Ok(config)
}

/// Parse and check a config document with default options.
pub fn from_str(content: &str) -> Result<Config> {
    from_str_with_options(content, &LoadOptions::default())
}

/// Parse and check a config document.
pub fn from_str_with_options(content: &str, options: &LoadOptions) -> Result<Config> {
    let document: Value = serde_json::from_str(content)?;
    ConfigValidator::with_options(options)?.validate(&document)?;

    let config: Config = serde_json::from_value(document)?;
    config.validate()?;
    Ok(config)
}
