//! Helpers for splicing `serde_yaml` output into template text

use serde_yaml::{self, Value};

/// Characters that end a plain scalar inside a flow sequence
const FLOW_INDICATORS: &[char] = &[',', '[', ']', '{', '}'];

/// Serialize a value, without the trailing newline serde_yaml adds
pub fn to_yaml_string(value: &Value) -> Result<String, serde_yaml::Error> {
    let mut rendered = serde_yaml::to_string(value)?;
    rendered.truncate(rendered.trim_end_matches('\n').len());
    Ok(rendered)
}

/// Render a string the way serde_yaml emits it as a mapping value
///
/// # Examples
/// ```
/// use vless2sub::utils::yaml::yaml_scalar;
///
/// assert_eq!(yaml_scalar("NodeA").unwrap(), "NodeA");
/// assert_eq!(yaml_scalar("0x1F").unwrap(), "'0x1F'");
/// ```
pub fn yaml_scalar(s: &str) -> Result<String, serde_yaml::Error> {
    to_yaml_string(&Value::String(s.to_string()))
}

/// Render a string as one item of an inline `[a, b]` list
///
/// serde_yaml only knows block context, so a plain or multi-line result that
/// would break the flow list is double-quoted instead.
pub fn yaml_flow_scalar(s: &str) -> Result<String, serde_yaml::Error> {
    let rendered = yaml_scalar(s)?;
    let quoted = rendered.starts_with(['\'', '"']);
    if rendered.contains('\n') || (!quoted && rendered.contains(FLOW_INDICATORS)) {
        // A JSON string literal is a valid YAML double-quoted scalar
        return serde_json::to_string(s).map_err(serde::ser::Error::custom);
    }
    Ok(rendered)
}

/// Lay out a serialized mapping as one item of a block sequence
pub fn sequence_item(rendered: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut item = String::with_capacity(rendered.len() + indent * 4);
    for (index, line) in rendered.lines().enumerate() {
        if index == 0 {
            item.push_str(&pad);
            item.push_str("- ");
        } else if !line.is_empty() {
            item.push_str(&pad);
            item.push_str("  ");
        }
        item.push_str(line);
        item.push('\n');
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reparse(rendered: &str) -> Value {
        serde_yaml::from_str(&format!("key: {}", rendered)).unwrap()
    }

    #[test]
    fn test_plain_scalars_stay_plain() {
        assert_eq!(yaml_scalar("example.com").unwrap(), "example.com");
        assert_eq!(
            yaml_scalar("11111111-1111-1111-1111-111111111111").unwrap(),
            "11111111-1111-1111-1111-111111111111"
        );
        assert_eq!(yaml_scalar("1.2.3.4").unwrap(), "1.2.3.4");
    }

    #[test]
    fn test_scalars_keep_their_string_type() {
        for s in ["0x1F", ".inf", "01", "12345", "true", "null", "~", "HK\t#1", "a: b", "- x", ""] {
            let rendered = yaml_scalar(s).unwrap();
            assert_eq!(reparse(&rendered)["key"], Value::String(s.to_string()), "{}", rendered);
        }
    }

    #[test]
    fn test_flow_scalar_survives_inline_list() {
        for s in ["NodeA", "HK, 01", "x]", "{a}", "HK\t#1", "0x1F", "two\nlines"] {
            let rendered = yaml_flow_scalar(s).unwrap();
            let list: Value = serde_yaml::from_str(&format!("[DIRECT, {}]", rendered)).unwrap();
            assert_eq!(list[1], Value::String(s.to_string()), "{}", rendered);
        }
        assert_eq!(yaml_flow_scalar("NodeA").unwrap(), "NodeA");
        assert_eq!(yaml_flow_scalar("HK, 01").unwrap(), "\"HK, 01\"");
    }

    #[test]
    fn test_sequence_item_indents_nested_lines() {
        assert_eq!(
            sequence_item("name: A\nopts:\n  key: v", 2),
            "  - name: A\n    opts:\n      key: v\n"
        );
    }
}
