//! The form fields of one outbound POST.

use tracing::debug;

use crate::payload::FieldMap;

/// Form field carrying the source label.
pub const SOURCE_FIELD: &str = "source";

/// Form field carrying the full decoded packet text.
pub const DATA_RAW_FIELD: &str = "data_raw";

/// Form field carrying the shared token.
pub const TOKEN_FIELD: &str = "token";

/// Complete set of form fields sent for one packet.
///
/// Always holds `source`, `data_raw` and `token`, plus whatever was extracted
/// from that packet. The three fixed fields win over an extracted field of
/// the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayPayload {
    fields: FieldMap,
}

impl RelayPayload {
    /// Merge extracted fields with the bridge metadata.
    ///
    /// `data_raw` is stored as given; it is never shortened.
    pub fn build(label: &str, data_raw: String, token: &str, extracted: FieldMap) -> Self {
        let mut fields = extracted;
        for (key, value) in [
            (SOURCE_FIELD, label.to_string()),
            (DATA_RAW_FIELD, data_raw),
            (TOKEN_FIELD, token.to_string()),
        ] {
            if let Some(shadowed) = fields.insert(key.to_string(), value) {
                debug!(
                    field = key,
                    shadowed = %shadowed,
                    "Extracted field replaced by bridge metadata"
                );
            }
        }
        Self { fields }
    }

    /// All form fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Value of one form field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The posted source label.
    pub fn source(&self) -> &str {
        self.get(SOURCE_FIELD).unwrap_or_default()
    }

    /// The full decoded packet text.
    pub fn data_raw(&self) -> &str {
        self.get(DATA_RAW_FIELD).unwrap_or_default()
    }

    /// Number of form fields, fixed ones included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false; the fixed fields are present in every payload.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
