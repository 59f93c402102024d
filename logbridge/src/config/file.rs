//! Configuration file handling for config.ini.
//!
//! The file is read once at startup. A missing file is not an error: every
//! setting falls back to its default.

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config.server.url, DEFAULT_SERVER_URL);
        assert_eq!(config.n1mm.port, DEFAULT_N1MM_PORT);
        assert_eq!(config.jtdx.port, DEFAULT_JTDX_PORT);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(
            &config_path,
            "[server]\nurl = http://127.0.0.1:8080/post\ntoken = XYZ\n\n[jtdx]\nenabled = false\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config.server.url, "http://127.0.0.1:8080/post");
        assert_eq!(config.server.token, "XYZ");
        assert!(!config.jtdx.enabled);
        assert!(config.n1mm.enabled);
    }

    #[test]
    fn test_invalid_value_message() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[n1mm]\nport = abc\n").unwrap();

        let err = ConfigFile::load_from(&config_path).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid configuration: n1mm.port = 'abc' - must be a UDP port number (0-65535)"
        );
    }
}
