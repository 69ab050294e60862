use serde_json::Value;

use super::{ConfigFileError, Values, Writer};

const COMMENT_COLUMN: usize = 36;

/// Line-per-item lists (plugin lists, ignore files, extension lists).
///
/// `header` is written first, then either `sections` (each `# name` followed
/// by its items, blank line between sections) or a flat `items` list. An item
/// is a string or `{id, comment}`; comments are aligned at column 36.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextListWriter;

impl Writer for TextListWriter {
    fn format(&self) -> &'static str {
        "textlist"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        let mut out = String::new();

        if let Some(header) = values.get("header").and_then(Value::as_str) {
            if !header.is_empty() {
                out.push_str(header);
                if !header.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        if let Some(Value::Array(sections)) = values.get("sections") {
            for (i, section) in sections.iter().filter_map(Value::as_object).enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                if let Some(name) = section.get("name").and_then(Value::as_str) {
                    if !name.is_empty() {
                        out.push_str("# ");
                        out.push_str(name);
                        out.push('\n');
                    }
                }
                write_items(&mut out, section.get("items"));
            }
        } else {
            write_items(&mut out, values.get("items"));
        }

        Ok(out.into_bytes())
    }
}

fn write_items(out: &mut String, items: Option<&Value>) {
    let Some(Value::Array(items)) = items else {
        return;
    };

    for item in items {
        match item {
            Value::String(id) => {
                out.push_str(id);
                out.push('\n');
            }
            Value::Object(item) => {
                let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
                if id.is_empty() {
                    continue;
                }
                out.push_str(id);

                if let Some(comment) = item
                    .get("comment")
                    .and_then(Value::as_str)
                    .filter(|c| !c.is_empty())
                {
                    let padding = COMMENT_COLUMN.saturating_sub(id.chars().count()).max(1);
                    out.push_str(&" ".repeat(padding));
                    out.push_str("# ");
                    out.push_str(comment);
                }
                out.push('\n');
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configfile::values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(input: serde_json::Value) -> String {
        String::from_utf8(TextListWriter.write(&values(input)).unwrap()).unwrap()
    }

    #[test]
    fn test_sections_with_aligned_comments() {
        let out = render(json!({
            "header": "# Plugins",
            "sections": [
                {"name": "Core", "items": ["tpm", {"id": "tmux-sensible", "comment": "defaults"}]},
                {"name": "Extra", "items": [{"id": "", "comment": "skipped"}, {"id": "resurrect"}]}
            ]
        }));

        assert_eq!(
            out,
            format!(
                "# Plugins\n# Core\ntpm\ntmux-sensible{}# defaults\n\n# Extra\nresurrect\n",
                " ".repeat(36 - "tmux-sensible".len())
            )
        );
    }

    #[test]
    fn test_long_ids_keep_one_space_before_comment() {
        let id = "x".repeat(40);

        let out = render(json!({"items": [{"id": id, "comment": "long"}]}));

        assert_eq!(out, format!("{id} # long\n"));
    }

    #[test]
    fn test_header_keeps_existing_newline() {
        assert_eq!(render(json!({"header": "# h\n", "items": ["a"]})), "# h\na\n");
    }

    #[test]
    fn test_empty_values_produce_empty_output() {
        assert_eq!(render(json!({})), "");
    }
}
