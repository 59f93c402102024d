//! JSON object flattening (JTDX / WSJT-X bridge style broadcasts).

use serde_json::Value;

use super::{ExtractError, FieldMap};

/// Flatten a JSON object into string fields.
///
/// Fails when the text is not JSON or the top-level value is not an object.
/// Values are stringified with [`value_to_field`].
pub fn extract_json(text: &str) -> Result<FieldMap, ExtractError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, value_to_field(value)))
            .collect()),
        other => Err(ExtractError::NotAnObject(json_kind(&other))),
    }
}

/// Textual form of a JSON value as posted in a form field.
///
/// - string: the string itself, unquoted
/// - null: empty string
/// - bool and number: their JSON text (`true`, `14074000`, `-12.5`)
/// - array and object: compact JSON text (`[1,2]`, `{"a":1}`)
pub fn value_to_field(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ft8_decode() {
        let fields = extract_json(r#"{"freq": 14074000, "mode": "FT8"}"#).unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["freq"], "14074000");
        assert_eq!(fields["mode"], "FT8");
    }

    #[test]
    fn test_scalar_stringification() {
        let fields =
            extract_json(r#"{"snr": -12, "dt": 0.3, "new": true, "grid": null}"#).unwrap();

        assert_eq!(fields["snr"], "-12");
        assert_eq!(fields["dt"], "0.3");
        assert_eq!(fields["new"], "true");
        assert_eq!(fields["grid"], "");
    }

    #[test]
    fn test_nested_values_serialized_compact() {
        let fields =
            extract_json(r#"{"calls": ["K1ABC", "W2XYZ"], "rig": {"name": "IC-7300", "pwr": 100}}"#)
                .unwrap();

        assert_eq!(fields["calls"], r#"["K1ABC","W2XYZ"]"#);
        assert_eq!(fields["rig"], r#"{"name":"IC-7300","pwr":100}"#);
    }

    #[test]
    fn test_empty_object() {
        assert!(extract_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_value_to_field_string_unquoted() {
        assert_eq!(value_to_field(json!("CQ DX")), "CQ DX");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            extract_json("[1, 2, 3]"),
            Err(ExtractError::NotAnObject("array"))
        ));
        assert!(matches!(
            extract_json("42"),
            Err(ExtractError::NotAnObject("number"))
        ));
        assert!(matches!(
            extract_json(r#""FT8""#),
            Err(ExtractError::NotAnObject("string"))
        ));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            extract_json("<contactinfo/>"),
            Err(ExtractError::Json(_))
        ));
        assert!(matches!(extract_json(""), Err(ExtractError::Json(_))));
    }
}
