use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{ConfigFileError, Values, Writer};

/// Pretty-printed JSON object with sorted keys, e.g. VS Code `settings.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl Writer for JsonWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        to_pretty_json(self.format(), values)
    }
}

/// JSON array, e.g. VS Code `keybindings.json`.
///
/// Writes `values.items` when present (wrapped if it is not an array),
/// otherwise the whole map as the single element.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArrayWriter;

impl Writer for JsonArrayWriter {
    fn format(&self) -> &'static str {
        "jsonarray"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        let items = match values.get("items") {
            Some(Value::Array(items)) => items.clone(),
            Some(item) => vec![item.clone()],
            None => vec![Value::Object(values.clone())],
        };

        to_pretty_json(self.format(), &items)
    }
}

pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(
    format: &'static str,
    value: &T,
) -> Result<Vec<u8>, ConfigFileError> {
    let mut out = serde_json::to_vec_pretty(value).map_err(|e| ConfigFileError::Json {
        format,
        source: Arc::new(e),
    })?;
    out.push(b'\n');

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configfile::values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_is_sorted_and_indented() {
        let out = JsonWriter
            .write(&values(json!({
                "editor.fontSize": 14,
                "editor.tabSize": 2,
                "[rust]": {"editor.formatOnSave": true},
            })))
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{
  "[rust]": {
    "editor.formatOnSave": true
  },
  "editor.fontSize": 14,
  "editor.tabSize": 2
}
"#
        );
    }

    #[test]
    fn test_json_output_parses_back() {
        let input = values(json!({"a": [1, 2, {"b": null}], "c": "d\"e"}));

        let out = JsonWriter.write(&input).unwrap();
        let parsed: Values = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed, input);
    }

    #[test]
    fn test_jsonarray_uses_items() {
        let out = JsonArrayWriter
            .write(&values(json!({"items": [{"key": "ctrl+p", "command": "quickOpen"}]})))
            .unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed, json!([{"key": "ctrl+p", "command": "quickOpen"}]));
    }

    #[test]
    fn test_jsonarray_without_items_wraps_values() {
        let out = JsonArrayWriter
            .write(&values(json!({"key": "ctrl+p"})))
            .unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed, json!([{"key": "ctrl+p"}]));
    }

    #[test]
    fn test_jsonarray_wraps_scalar_items() {
        let out = JsonArrayWriter
            .write(&values(json!({"items": "only"})))
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[\n  \"only\"\n]\n");
    }
}
