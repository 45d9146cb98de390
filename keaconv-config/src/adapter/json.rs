//! Plain JSON output

use keaconv_core::{Element, Value};
use serde_json::Value as Json;

/// JSON value of `root`. Comments are dropped; skipped entries are
/// dropped too unless `include_skipped` is set.
pub fn to_json(root: &Element, include_skipped: bool) -> Json {
    let keep = |element: &Element| include_skipped || !element.skip;
    match &root.value {
        Value::Null => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Integer(i) => Json::from(*i),
        Value::String(s) => Json::String(s.clone()),
        Value::Map(map) => Json::Object(
            map.iter()
                .filter(|(_, v)| keep(v))
                .map(|(k, v)| (k.to_string(), to_json(v, include_skipped)))
                .collect(),
        ),
        Value::List(items) => Json::Array(
            items
                .iter()
                .filter(|item| keep(item))
                .map(|item| to_json(item, include_skipped))
                .collect(),
        ),
    }
}

/// Pretty printed JSON text of `root`
pub fn serialize(root: &Element, include_skipped: bool) -> keaconv_core::Result<String> {
    serde_json::to_string_pretty(&to_json(root, include_skipped))
        .map_err(|e| keaconv_core::Error::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keaconv_core::Map;

    fn sample() -> Element {
        let mut dhcp4 = Map::new();
        dhcp4.set("valid-lifetime", Element::integer(600).with_comment("/// moved"));
        dhcp4.push("config", Element::string("x").skipped());
        dhcp4.push("option-data", Element::string("a"));
        dhcp4.push("option-data", Element::string("b").skipped());
        let mut root = Map::new();
        root.set("Dhcp4", dhcp4);
        Element::map(root)
    }

    #[test]
    fn test_keeps_everything() {
        let json = to_json(&sample(), true);
        assert_eq!(json["Dhcp4"]["valid-lifetime"], 600);
        assert_eq!(json["Dhcp4"]["option-data"].as_array().unwrap().len(), 2);
        assert!(json["Dhcp4"].get("config").is_some());
    }

    #[test]
    fn test_drops_skipped() {
        let json = to_json(&sample(), false);
        assert_eq!(json["Dhcp4"]["option-data"], serde_json::json!(["a"]));
        let keys: Vec<&String> = json["Dhcp4"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["valid-lifetime", "config", "option-data"]);
    }

    #[test]
    fn test_serialize() {
        let text = serialize(&sample(), false).unwrap();
        assert!(text.starts_with("{\n  \"Dhcp4\""));
    }
}
