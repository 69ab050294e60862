use serde_json::Value;

use super::{ConfigFileError, Values, Writer, scalar_to_string};

/// `key = value` lines, sorted by key (ghostty, kitty-style configs).
/// Array values repeat the key once per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueWriter;

impl Writer for KeyValueWriter {
    fn format(&self) -> &'static str {
        "keyvalue"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        let mut out = String::new();

        for (key, value) in values {
            let rendered = match value {
                Value::Array(items) => items.iter().map(scalar_to_string).collect::<Option<Vec<_>>>(),
                other => scalar_to_string(other).map(|s| vec![s]),
            }
            .ok_or_else(|| {
                ConfigFileError::invalid(
                    self.format(),
                    format!("`{key}` must be a scalar or a list of scalars"),
                )
            })?;

            for value in rendered {
                out.push_str(&format!("{key} = {value}\n"));
            }
        }

        Ok(out.into_bytes())
    }
}
