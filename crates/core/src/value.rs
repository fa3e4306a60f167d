//! Generic value helpers: emptiness check and shallow object merge

use serde_json::{Map, Value};

/// Whether a value carries no content
///
/// `null`, `""`, `[]` and `{}` are empty. Numbers and booleans never are,
/// including `0` and `false`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Shallow merge of `source` into `target`
///
/// Keys present in `source` overwrite the same keys in `target`; nested
/// objects are replaced, not merged. When either side is not an object the
/// later value (`source`) wins.
pub fn merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            base.extend(overlay);
            Value::Object(base)
        }
        (_, source) => source,
    }
}

/// Left fold of [`merge`] starting from an empty object
pub fn merge_all<I>(values: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    values
        .into_iter()
        .fold(Value::Object(Map::new()), merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!([])));
        assert!(is_empty(&json!({})));

        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!(false)));
        assert!(!is_empty(&json!(" ")));
        assert!(!is_empty(&json!([null])));
        assert!(!is_empty(&json!({"a": null})));
    }

    #[test]
    fn test_merge_later_keys_win() {
        let merged = merge(
            json!({"a": 1, "b": {"x": 1}}),
            json!({"b": {"y": 2}, "c": 3}),
        );
        assert_eq!(merged, json!({"a": 1, "b": {"y": 2}, "c": 3}));
    }

    #[test]
    fn test_merge_non_object_takes_source() {
        assert_eq!(merge(json!({"a": 1}), json!([1, 2])), json!([1, 2]));
        assert_eq!(merge(json!(5), json!({"a": 1})), json!({"a": 1}));
    }

    #[test]
    fn test_merge_all() {
        let merged = merge_all(vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3})]);
        assert_eq!(merged, json!({"a": 3, "b": 2}));
        assert_eq!(merge_all(Vec::new()), json!({}));
    }
}
