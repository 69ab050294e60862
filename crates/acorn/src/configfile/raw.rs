use super::{ConfigFileError, Values, Writer};

/// Writes `values.content` verbatim; scripts and other hand-written text.
/// Missing content produces an empty file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawWriter;

impl Writer for RawWriter {
    fn format(&self) -> &'static str {
        "raw"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        Ok(values
            .get("content")
            .and_then(|content| content.as_str())
            .map(|content| content.as_bytes().to_vec())
            .unwrap_or_default())
    }
}
