//! Kea JSON with comments
//!
//! Kea accepts `//` comments in its configuration files. Element comments
//! are printed on their own lines before the entry, and skipped entries
//! are printed commented out so the file still loads.

use keaconv_core::{Element, Value};

const INDENT: &str = "    ";

struct Writer {
    out: String,
}

impl Writer {
    fn line(&mut self, depth: usize, commented: bool, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        if commented {
            self.out.push_str("//");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn entry(
        &mut self,
        depth: usize,
        key: Option<&str>,
        element: &Element,
        comma: bool,
        commented: bool,
    ) {
        let commented = commented || element.skip;
        for comment in &element.comments {
            self.line(depth, false, comment);
        }

        let prefix = key.map_or_else(String::new, |k| format!("{}: ", quote(k)));
        let comma = if comma { "," } else { "" };
        match &element.value {
            Value::Map(map) if !map.is_empty() => {
                self.line(depth, commented, &format!("{}{{", prefix));
                let entries: Vec<(&str, &Element)> = map.iter().collect();
                let children: Vec<&Element> = entries.iter().map(|(_, e)| *e).collect();
                for (i, &(k, child)) in entries.iter().enumerate() {
                    let comma = needs_comma(&children, i, commented);
                    self.entry(depth + 1, Some(k), child, comma, commented);
                }
                self.line(depth, commented, &format!("}}{}", comma));
            }
            Value::List(items) if !items.is_empty() => {
                self.line(depth, commented, &format!("{}[", prefix));
                let children: Vec<&Element> = items.iter().collect();
                for (i, child) in items.iter().enumerate() {
                    let comma = needs_comma(&children, i, commented);
                    self.entry(depth + 1, None, child, comma, commented);
                }
                self.line(depth, commented, &format!("]{}", comma));
            }
            _ => {
                let text = format!("{}{}{}", prefix, scalar(&element.value), comma);
                self.line(depth, commented, &text);
            }
        }
    }
}

/// Live entries take a comma when a live sibling follows. Inside a
/// commented out block every entry but the last does.
fn needs_comma(siblings: &[&Element], index: usize, commented: bool) -> bool {
    let rest = &siblings[index + 1..];
    if commented || siblings[index].skip {
        !rest.is_empty()
    } else {
        rest.iter().any(|e| !e.skip)
    }
}

fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::String(s) => quote(s),
        Value::Map(_) => "{}".to_string(),
        Value::List(_) => "[]".to_string(),
    }
}

/// Annotated Kea configuration text of `root`
pub fn render(root: &Element) -> String {
    let mut writer = Writer { out: String::new() };
    writer.entry(0, None, root, false, false);
    writer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use keaconv_core::Map;

    #[test]
    fn test_scalars_and_comments() {
        let mut map = Map::new();
        map.set(
            "valid-lifetime",
            Element::integer(600).with_comment("/// moved from an internal pool scope"),
        );
        map.set("name", "a \"b\"");
        let text = render(&Element::map(map));
        assert_eq!(
            text,
            "{\n    /// moved from an internal pool scope\n    \"valid-lifetime\": 600,\n    \"name\": \"a \\\"b\\\"\"\n}\n"
        );
    }

    #[test]
    fn test_skipped_entries_are_commented_out() {
        let mut inner = Map::new();
        inner.set("name", "ping-check");
        inner.set("value", true);
        let mut map = Map::new();
        map.set("authoritative", true);
        map.push("config", Element::map(inner).skipped());
        let text = render(&Element::map(map));
        assert_eq!(
            text,
            concat!(
                "{\n",
                "    \"authoritative\": true,\n",
                "    \"config\": [\n",
                "        //{\n",
                "            //\"name\": \"ping-check\",\n",
                "            //\"value\": true\n",
                "        //}\n",
                "    ]\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_no_comma_before_trailing_skipped_entry() {
        let mut map = Map::new();
        map.set("a", 1i64);
        map.set("b", Element::null().skipped());
        let text = render(&Element::map(map));
        assert!(text.contains("\"a\": 1\n"));
        assert!(text.contains("//\"b\": null\n"));
    }

    #[test]
    fn test_empty_containers() {
        let mut map = Map::new();
        map.set("pools", Element::list(Vec::new()));
        assert_eq!(render(&Element::map(map)), "{\n    \"pools\": []\n}\n");
    }
}
