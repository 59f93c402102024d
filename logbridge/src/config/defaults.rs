//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::source::Source;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

// =============================================================================
// [server]
// =============================================================================

/// Default remote endpoint.
pub const DEFAULT_SERVER_URL: &str = "http://example.com/post";

/// Default shared token.
pub const DEFAULT_SERVER_TOKEN: &str = "ABC123";

// =============================================================================
// [n1mm] / [jtdx]
// =============================================================================

/// Default N1MM Logger+ broadcast port.
pub const DEFAULT_N1MM_PORT: u16 = 12060;

/// Default JTDX / WSJT-X UDP server port.
pub const DEFAULT_JTDX_PORT: u16 = 2237;

/// Default port for a source.
pub fn default_port(source: Source) -> u16 {
    match source {
        Source::ContestLogger => DEFAULT_N1MM_PORT,
        Source::DigitalModeDecoder => DEFAULT_JTDX_PORT,
    }
}

// =============================================================================
// [log]
// =============================================================================

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "bridge.log";

// =============================================================================
// [relay]
// =============================================================================

/// Default number of POSTs allowed in flight.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Default number of packets allowed to wait for a POST slot.
pub const DEFAULT_MAX_PENDING: usize = 1024;

/// Raises `max_pending` to at least `max_in_flight`, warning when it does.
pub(super) fn clamp_max_pending(max_pending: usize, max_in_flight: usize) -> usize {
    if max_pending < max_in_flight {
        tracing::warn!(
            requested = max_pending,
            min = max_in_flight,
            "relay.max_pending below relay.max_in_flight, clamping to {}",
            max_in_flight
        );
        max_in_flight
    } else {
        max_pending
    }
}

fn default_source(source: Source) -> SourceSettings {
    SourceSettings {
        enabled: true,
        port: default_port(source),
        label: source.default_label().to_string(),
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                url: DEFAULT_SERVER_URL.to_string(),
                token: DEFAULT_SERVER_TOKEN.to_string(),
            },
            n1mm: default_source(Source::ContestLogger),
            jtdx: default_source(Source::DigitalModeDecoder),
            logging: LoggingSettings {
                enabled: true,
                file: PathBuf::from(DEFAULT_LOG_FILE),
            },
            relay: RelaySettings {
                max_in_flight: DEFAULT_MAX_IN_FLIGHT,
                max_pending: DEFAULT_MAX_PENDING,
            },
        }
    }
}
