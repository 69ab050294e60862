use serde_json::Value;

use super::{ConfigFileError, Values, Writer, scalar_to_string};

/// git-config style INI.
///
/// The top level maps section names to key/value maps. A dotted section name
/// such as `diff.json` becomes `[diff "json"]`; array values repeat the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniWriter;

impl Writer for IniWriter {
    fn format(&self) -> &'static str {
        "ini"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        let mut out = String::new();

        for (section, entries) in values {
            let Value::Object(entries) = entries else {
                return Err(ConfigFileError::invalid(
                    self.format(),
                    format!("section `{section}` must be a map of keys to values"),
                ));
            };

            match section.split_once('.') {
                Some((name, subsection)) => {
                    out.push_str(&format!("[{name} \"{}\"]\n", subsection.replace('"', "\\\"")));
                }
                None => out.push_str(&format!("[{section}]\n")),
            }

            for (key, value) in entries {
                for rendered in self.render_value(section, key, value)? {
                    out.push_str(&format!("\t{key} = {rendered}\n"));
                }
            }
        }

        Ok(out.into_bytes())
    }
}

impl IniWriter {
    fn render_value(
        &self,
        section: &str,
        key: &str,
        value: &Value,
    ) -> Result<Vec<String>, ConfigFileError> {
        let invalid = || {
            ConfigFileError::invalid(
                self.format(),
                format!("`{section}.{key}` must be a scalar or a list of scalars"),
            )
        };

        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| scalar_to_string(item).ok_or_else(invalid))
                .collect(),
            other => scalar_to_string(other).map(|s| vec![s]).ok_or_else(invalid),
        }
    }
}
