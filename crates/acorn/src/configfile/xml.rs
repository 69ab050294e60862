use std::fmt::Write as _;

use serde_json::Value;

use super::{ConfigFileError, Values, Writer, scalar_to_string};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const INDENT: &str = "  ";

/// XML documents such as IDE keymaps.
///
/// ```yaml
/// root: keymap
/// attributes: {version: "1", name: Custom}
/// children:
///   - name: action
///     attributes: {id: GotoFile}
///     children:
///       - name: keyboard-shortcut
///         attributes: {first-keystroke: meta P}
/// ```
///
/// `attrs` and `element` are accepted in place of `attributes` and `name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlWriter;

impl Writer for XmlWriter {
    fn format(&self) -> &'static str {
        "xml"
    }

    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
        let root = values
            .get("root")
            .and_then(Value::as_str)
            .filter(|root| !root.is_empty())
            .ok_or_else(|| {
                ConfigFileError::invalid(self.format(), "xml format requires a `root` element name")
            })?;

        let mut out = String::from(DECLARATION);
        write_element(&mut out, root, values, 0);

        Ok(out.into_bytes())
    }
}

fn write_element(out: &mut String, name: &str, element: &Values, depth: usize) {
    let indent = INDENT.repeat(depth);

    let _ = write!(out, "{indent}<{name}");
    if let Some(Value::Object(attributes)) = element.get("attributes").or_else(|| element.get("attrs")) {
        for (key, value) in attributes {
            let value = scalar_to_string(value).unwrap_or_else(|| value.to_string());
            let _ = write!(out, " {key}=\"{}\"", escape(&value));
        }
    }

    let children: Vec<(&str, &Values)> = match element.get("children") {
        Some(Value::Array(children)) => children
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|child| {
                child
                    .get("name")
                    .or_else(|| child.get("element"))
                    .and_then(Value::as_str)
                    .map(|child_name| (child_name, child))
            })
            .collect(),
        _ => Vec::new(),
    };
    let content = element.get("content").and_then(scalar_to_string);

    if children.is_empty() && content.is_none() {
        out.push_str("/>\n");
        return;
    }

    out.push('>');
    if let Some(content) = content {
        out.push_str(&escape(&content));
    }

    if !children.is_empty() {
        out.push('\n');
        for (child_name, child) in children {
            write_element(out, child_name, child, depth + 1);
        }
        out.push_str(&indent);
    }

    let _ = writeln!(out, "</{name}>");
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configfile::values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(input: serde_json::Value) -> String {
        String::from_utf8(XmlWriter.write(&values(input)).unwrap()).unwrap()
    }

    #[test]
    fn test_nested_keymap() {
        let out = render(json!({
            "root": "keymap",
            "attributes": {"version": 1, "name": "Custom", "parent": "Mac OS X 10.5+"},
            "children": [
                {
                    "name": "action",
                    "attributes": {"id": "GotoFile"},
                    "children": [
                        {"name": "keyboard-shortcut", "attributes": {"first-keystroke": "meta P"}}
                    ]
                },
                {"element": "note", "content": "a < b & c"}
            ]
        }));

        assert_eq!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<keymap name="Custom" parent="Mac OS X 10.5+" version="1">
  <action id="GotoFile">
    <keyboard-shortcut first-keystroke="meta P"/>
  </action>
  <note>a &lt; b &amp; c</note>
</keymap>
"#
        );
    }

    #[test]
    fn test_root_without_children_self_closes() {
        assert_eq!(
            render(json!({"root": "empty", "attrs": {"q": "it's \"x\""}})),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<empty q=\"it&apos;s &quot;x&quot;\"/>\n"
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = XmlWriter.write(&values(json!({"children": []}))).unwrap_err();

        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn test_children_without_a_name_are_skipped() {
        let out = render(json!({
            "root": "r",
            "children": [{"content": "orphan"}, {"name": "kept"}]
        }));

        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<r>\n  <kept/>\n</r>\n"
        );
    }
}
