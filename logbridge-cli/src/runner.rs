//! CLI runner for common setup.
//!
//! Loads the configuration and initializes logging before the bridge starts.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use logbridge::config::ConfigFile;
use logbridge::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps file logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration, shared read-only with every listener
    config: Arc<ConfigFile>,
}

impl CliRunner {
    /// Load config from `config_path` and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - INI file to read; a missing file means defaults
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(config_path: &Path, debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path).map_err(|error| CliError::Config {
            path: config_path.to_path_buf(),
            error,
        })?;

        let logging_guard = init_logging(&config.logging, debug_mode)?;

        Ok(Self {
            logging_guard,
            config: Arc::new(config),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> Arc<ConfigFile> {
        Arc::clone(&self.config)
    }

    /// Log startup information.
    pub fn log_startup(&self, config_path: &Path) {
        info!("logbridge v{} starting", logbridge::VERSION);
        if config_path.exists() {
            info!("Using configuration {}", config_path.display());
        } else {
            info!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
        }
        if self.config.logging.enabled {
            info!("Logging to {}", self.config.logging.file.display());
        }
    }
}
