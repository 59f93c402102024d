//! Packet sources and their extraction policy.
//!
//! Each UDP listener is bound to exactly one [`Source`]. The source decides
//! which config section describes the listener and in which order payload
//! formats are tried when extracting fields.

use std::fmt;

use crate::payload::ExtractStrategy;

/// Origin of a relayed packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Contest logging program (N1MM Logger+), XML broadcasts.
    ContestLogger,
    /// Digital-mode decoder (JTDX / WSJT-X), JSON or XML broadcasts.
    DigitalModeDecoder,
}

impl Source {
    /// All sources, in the order the bridge starts their listeners.
    pub const ALL: [Source; 2] = [Source::ContestLogger, Source::DigitalModeDecoder];

    /// Name of the INI section configuring this source.
    pub fn section(self) -> &'static str {
        match self {
            Source::ContestLogger => "n1mm",
            Source::DigitalModeDecoder => "jtdx",
        }
    }

    /// Label posted as the `source` form field unless overridden in config.
    pub fn default_label(self) -> &'static str {
        match self {
            Source::ContestLogger => "ContestLogger",
            Source::DigitalModeDecoder => "DigitalModeDecoder",
        }
    }

    /// Extraction strategies, tried in order until one succeeds.
    pub fn strategies(self) -> &'static [ExtractStrategy] {
        match self {
            Source::ContestLogger => &[ExtractStrategy::Xml],
            Source::DigitalModeDecoder => &[ExtractStrategy::Json, ExtractStrategy::Xml],
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_label())
    }
}
