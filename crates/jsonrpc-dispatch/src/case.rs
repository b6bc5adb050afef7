//! camelCase to snake_case normalization of method names and named params

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

// A capitalised word following any character: "fooMethod" -> "foo_Method"
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
// A capital following a lowercase letter or digit: "getHTTP" -> "get_HTTP"
static LOWER_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert a camelCase identifier to snake_case.
///
/// Already snake_cased names are returned unchanged.
pub fn to_snake_case(name: &str) -> String {
    let spaced = WORD_BOUNDARY.replace_all(name, "${1}_${2}");
    LOWER_UPPER
        .replace_all(&spaced, "${1}_${2}")
        .to_lowercase()
}

/// Rename the keys of `value` if it is an object, recursing into values
/// that are themselves objects.
///
/// Arrays are returned as-is, including any objects inside them.
pub fn convert_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(convert_map(map)),
        other => other,
    }
}

pub fn convert_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (to_snake_case(&key), convert_keys(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("fooMethod"), "foo_method");
        assert_eq!(to_snake_case("aDict"), "a_dict");
        assert_eq!(to_snake_case("FooBar"), "foo_bar");
        assert_eq!(to_snake_case("getHTTPResponse"), "get_http_response");
        assert_eq!(to_snake_case("version2Beta"), "version2_beta");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("foo"), "foo");
    }

    #[test]
    fn test_convert_nested_keys() {
        let converted = convert_keys(json!({
            "fooParam": 1,
            "aDict": {"barParam": 1},
        }));
        assert_eq!(converted, json!({"foo_param": 1, "a_dict": {"bar_param": 1}}));
    }

    #[test]
    fn test_array_elements_untouched() {
        let converted = convert_keys(json!({
            "someList": ["CamelCase", {"innerKey": "KeepValue"}],
        }));
        assert_eq!(
            converted,
            json!({"some_list": ["CamelCase", {"innerKey": "KeepValue"}]})
        );
    }

    #[test]
    fn test_top_level_array_untouched() {
        let value = json!([{"fooParam": 1}]);
        assert_eq!(convert_keys(value.clone()), value);
    }
}
