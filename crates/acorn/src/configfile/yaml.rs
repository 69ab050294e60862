use std::sync::Arc;

use super::{ConfigFileError, Values, Writer};

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlWriter;

impl Writer for YamlWriter {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        serde_yaml::to_string(values)
            .map(String::into_bytes)
            .map_err(|e| ConfigFileError::Yaml(Arc::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configfile::values;
    use serde_json::json;

    #[test]
    fn test_yaml_output_parses_back() {
        let input = values(json!({
            "k9s": {"refreshRate": 2, "ui": {"skin": "dracula", "headless": false}},
            "contexts": ["dev", "prod"],
        }));

        let out = YamlWriter.write(&input).unwrap();
        let parsed: Values = serde_yaml::from_slice(&out).unwrap();

        assert_eq!(parsed, input);
    }

    #[test]
    fn test_yaml_keys_are_sorted() {
        let out = YamlWriter.write(&values(json!({"b": 1, "a": 2}))).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "a: 2\nb: 1\n");
    }
}
