//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use logbridge::config::ConfigFileError;
use logbridge::logging::LoggingError;
use logbridge::relay::RelayError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to load the configuration file
    Config { path: PathBuf, error: ConfigFileError },
    /// Failed to initialize logging
    LoggingInit(LoggingError),
    /// Failed to create the HTTP client
    HttpClient(RelayError),
    /// Failed to wait for the interrupt signal
    Signal(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Config { path, .. } = self {
            eprintln!();
            eprintln!("Check the settings in {}.", path.display());
            eprintln!("Delete the file to run with built-in defaults.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config { path, error } => {
                write!(f, "Failed to load '{}': {}", path.display(), error)
            }
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::HttpClient(e) => write!(f, "{}", e),
            CliError::Signal(e) => write!(f, "Failed to listen for interrupt: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config { error, .. } => Some(error),
            CliError::LoggingInit(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Signal(e) => Some(e),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::LoggingInit(e)
    }
}

impl From<RelayError> for CliError {
    fn from(e: RelayError) -> Self {
        CliError::HttpClient(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = CliError::Config {
            path: PathBuf::from("config.ini"),
            error: ConfigFileError::InvalidValue {
                section: "n1mm".to_string(),
                key: "port".to_string(),
                value: "abc".to_string(),
                reason: "must be a UDP port number (0-65535)".to_string(),
            },
        };

        assert_eq!(
            err.to_string(),
            "Failed to load 'config.ini': Invalid configuration: n1mm.port = 'abc' - must be a UDP port number (0-65535)"
        );
    }

    #[test]
    fn test_http_client_error_message() {
        let err = CliError::from(RelayError::ClientBuild("no TLS backend".to_string()));
        assert_eq!(err.to_string(), "Failed to create HTTP client: no TLS backend");
    }
}
