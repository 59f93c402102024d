//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing logic.

use std::path::PathBuf;

use crate::source::Source;

/// Complete bridge configuration loaded from config.ini.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Remote endpoint settings
    pub server: ServerSettings,
    /// Contest logger (N1MM) listener settings
    pub n1mm: SourceSettings,
    /// Digital-mode decoder (JTDX/WSJT-X) listener settings
    pub jtdx: SourceSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Dispatch pool settings
    pub relay: RelaySettings,
}

impl ConfigFile {
    /// Listener settings for the given source.
    pub fn source(&self, source: Source) -> &SourceSettings {
        match source {
            Source::ContestLogger => &self.n1mm,
            Source::DigitalModeDecoder => &self.jtdx,
        }
    }

    pub(super) fn source_mut(&mut self, source: Source) -> &mut SourceSettings {
        match source {
            Source::ContestLogger => &mut self.n1mm,
            Source::DigitalModeDecoder => &mut self.jtdx,
        }
    }
}

/// Remote HTTP endpoint.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// URL receiving the form POST
    pub url: String,
    /// Shared token sent as the `token` form field
    pub token: String,
}

/// One UDP listener.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Whether the listener is started at all
    pub enabled: bool,
    /// UDP port bound on 0.0.0.0
    pub port: u16,
    /// Value posted in the `source` form field
    pub label: String,
}

/// Log output configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Append log lines to `file` in addition to stdout
    pub enabled: bool,
    /// Log file path
    pub file: PathBuf,
}

/// Bounds on concurrent outbound POSTs.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Maximum POSTs running at the same time.
    pub max_in_flight: usize,
    /// Maximum packets waiting for or holding a POST slot.
    /// Packets beyond this are dropped with a warning.
    pub max_pending: usize,
}
