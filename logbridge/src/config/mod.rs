//! Bridge configuration.
//!
//! Settings are read from an INI file once at startup and never reloaded.
//! Settings structs live in [`settings`], constants in [`defaults`],
//! parsing in `parser`, and file loading in `file`.

mod defaults;
mod file;
mod parser;
mod settings;

pub use defaults::{
    default_port, DEFAULT_CONFIG_FILE, DEFAULT_JTDX_PORT, DEFAULT_LOG_FILE, DEFAULT_MAX_IN_FLIGHT,
    DEFAULT_MAX_PENDING, DEFAULT_N1MM_PORT, DEFAULT_SERVER_TOKEN, DEFAULT_SERVER_URL,
};
pub use file::ConfigFileError;
pub use settings::{ConfigFile, LoggingSettings, RelaySettings, ServerSettings, SourceSettings};
