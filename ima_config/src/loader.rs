use crate::ImaConfig;

/// The configuration bundled with the converter, used when no
/// configuration file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../default-config.json");

/// File name used when writing [DEFAULT_CONFIG] to disk.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "default-config.json";

/// The configuration document could not be parsed into an [ImaConfig].
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct ConfigParseError(#[from] json5::Error);

impl ImaConfig {
    /// Parse a configuration document.
    ///
    /// The document is JSON5, so comments and trailing commas are accepted.
    /// Unknown keys are ignored. A value of the wrong type, or an integer
    /// which does not fit in its field, fails the whole document.
    pub fn parse(text: &str) -> Result<Self, ConfigParseError> {
        json5::from_str(text).map_err(ConfigParseError)
    }

    /// Parse [DEFAULT_CONFIG].
    pub fn embedded_default() -> Result<Self, ConfigParseError> {
        Self::parse(DEFAULT_CONFIG)
    }
}
