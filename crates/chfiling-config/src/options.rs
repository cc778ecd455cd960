/// Controls how a config document is loaded and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// When true, keys not named by the schema are rejected.
    pub strict_mode: bool,
    /// Maximum bytes accepted from a config file.
    pub max_config_file_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            max_config_file_size: 64 * 1024,
        }
    }
}
