//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::clamp_max_pending;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::source::Source;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("server", "url", v, "must not be empty"));
            }
            config.server.url = v.to_string();
        }
        if let Some(v) = section.get("token") {
            config.server.token = v.trim().to_string();
        }
    }

    // [n1mm] and [jtdx] sections
    for source in Source::ALL {
        let name = source.section();
        if let Some(section) = ini.section(Some(name)) {
            let settings = config.source_mut(source);
            if let Some(v) = section.get("enabled") {
                settings.enabled = parse_bool(v);
            }
            if let Some(v) = section.get("port") {
                settings.port =
                    parse_number(name, "port", v, "must be a UDP port number (0-65535)")?;
            }
            if let Some(v) = section.get("label") {
                let v = v.trim();
                if v.is_empty() {
                    return Err(invalid(name, "label", v, "must not be empty"));
                }
                settings.label = v.to_string();
            }
        }
    }

    // [log] section
    if let Some(section) = ini.section(Some("log")) {
        if let Some(v) = section.get("enable") {
            config.logging.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = PathBuf::from(v);
            }
        }
    }

    // [relay] section
    if let Some(section) = ini.section(Some("relay")) {
        parse_relay(section, &mut config)?;
    }

    Ok(config)
}

fn parse_relay(section: &Properties, config: &mut ConfigFile) -> Result<(), ConfigFileError> {
    if let Some(v) = section.get("max_in_flight") {
        let parsed: usize =
            parse_number("relay", "max_in_flight", v, "must be a positive integer")?;
        if parsed == 0 {
            return Err(invalid("relay", "max_in_flight", v, "must be a positive integer"));
        }
        config.relay.max_in_flight = parsed;
    }
    if let Some(v) = section.get("max_pending") {
        config.relay.max_pending =
            parse_number("relay", "max_pending", v, "must be a positive integer")?;
    }
    config.relay.max_pending =
        clamp_max_pending(config.relay.max_pending, config.relay.max_in_flight);
    Ok(())
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a boolean value from a config string.
/// Accepts: 1, true, yes, on (case-insensitive). Anything else is false.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}
