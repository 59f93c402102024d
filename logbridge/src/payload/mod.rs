//! Payload decoding and field extraction.
//!
//! A datagram goes through two steps before it can be relayed:
//!
//! ```text
//! bytes ──decode_payload──► text ──extract_fields(source)──► FieldMap
//! ```
//!
//! Extraction is an ordered list of [`ExtractStrategy`] values chosen by the
//! [`Source`]. The first strategy that succeeds wins; when all of them fail
//! the packet is still relayed, just without extracted fields.

mod decode;
mod json;
mod xml;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::source::Source;

pub use decode::{decode_payload, preview, PREVIEW_CHARS};
pub use json::{extract_json, value_to_field};
pub use xml::extract_xml;

/// Flat field name → value mapping extracted from one packet.
pub type FieldMap = BTreeMap<String, String>;

/// Why a strategy could not extract fields.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The text is not a well-formed XML document.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The text is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("JSON payload is a {0}, not an object")]
    NotAnObject(&'static str),
}

/// A single way of turning decoded text into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStrategy {
    /// Flatten a top-level JSON object.
    Json,
    /// Take the direct children of the XML root element.
    Xml,
}

impl ExtractStrategy {
    /// Run this strategy on `text`.
    pub fn apply(self, text: &str) -> Result<FieldMap, ExtractError> {
        match self {
            ExtractStrategy::Json => extract_json(text),
            ExtractStrategy::Xml => extract_xml(text),
        }
    }
}

/// Extract fields using the strategy chain of `source`.
pub fn extract_fields(source: Source, text: &str) -> FieldMap {
    extract_with(source.strategies(), text)
}

/// Try `strategies` in order, returning the first successful result.
///
/// Failures are logged and never returned: an exhausted chain yields an
/// empty map.
pub fn extract_with(strategies: &[ExtractStrategy], text: &str) -> FieldMap {
    for strategy in strategies {
        match strategy.apply(text) {
            Ok(fields) => return fields,
            Err(e) => match strategy {
                ExtractStrategy::Xml => warn!("{}", e),
                ExtractStrategy::Json => debug!("{}, trying next format", e),
            },
        }
    }
    FieldMap::new()
}
