//! Declarative field probing over untyped JSON.
//!
//! A [`FieldPath`] is one candidate key sequence. Lists of paths are walked in
//! order and the first usable hit wins, so the probe order lives in constant
//! tables rather than in chains of `get` calls.

use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static [&'static str]);

impl FieldPath {
    pub const fn new(keys: &'static [&'static str]) -> Self { Self(keys) }

    pub fn keys(&self) -> &'static [&'static str] { self.0 }

    /// Follow the keys through nested objects. Non-object hops yield `None`.
    pub fn resolve<'a>(&self, raw: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(raw, |cur, key| cur.as_object()?.get(*key))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

/// Textual reading of a scalar: non-blank strings as-is, numbers rendered.
/// Null, booleans, blank strings and containers count as absent.
pub fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First path yielding text, with the index of the path that matched.
pub fn first_text_at(raw: &Value, paths: &[FieldPath]) -> Option<(usize, String)> {
    paths
        .iter()
        .enumerate()
        .find_map(|(i, p)| p.resolve(raw).and_then(as_text).map(|t| (i, t)))
}

pub fn first_text(raw: &Value, paths: &[FieldPath]) -> Option<String> {
    first_text_at(raw, paths).map(|(_, t)| t)
}

/// First path landing on a JSON object.
pub fn first_object<'a>(raw: &'a Value, paths: &[FieldPath]) -> Option<&'a Map<String, Value>> {
    paths.iter().find_map(|p| p.resolve(raw).and_then(Value::as_object))
}

/// First path landing on a JSON array.
pub fn first_array<'a>(raw: &'a Value, paths: &[FieldPath]) -> Option<&'a Vec<Value>> {
    paths.iter().find_map(|p| p.resolve(raw).and_then(Value::as_array))
}

/// First numeric reading; numeric strings are accepted.
pub fn first_number(raw: &Value, paths: &[FieldPath]) -> Option<f64> {
    paths.iter().find_map(|p| match p.resolve(raw)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

/// Single-key shorthand used for flat field lists.
#[macro_export]
macro_rules! field_paths {
    ($($key:literal),* $(,)?) => {
        [$($crate::normalize::FieldPath::new(&[$key])),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PATHS: [FieldPath; 3] = [
        FieldPath::new(&["a"]),
        FieldPath::new(&["b", "c"]),
        FieldPath::new(&["d", "e", "f"]),
    ];

    #[test]
    fn resolves_nested_keys_and_stops_on_scalars() {
        let raw = json!({"b": {"c": "deep"}, "d": "flat"});
        assert_eq!(PATHS[1].resolve(&raw), Some(&json!("deep")));
        assert_eq!(PATHS[2].resolve(&raw), None);
        assert_eq!(FieldPath::new(&[]).resolve(&raw), Some(&raw));
    }

    #[test]
    fn first_hit_wins_in_declared_order() {
        let raw = json!({"a": "", "b": {"c": "second"}, "d": {"e": {"f": "third"}}});
        assert_eq!(first_text_at(&raw, &PATHS), Some((1, "second".to_string())));
        let raw = json!({"a": 7, "b": {"c": "second"}});
        assert_eq!(first_text(&raw, &PATHS).as_deref(), Some("7"));
    }

    #[test]
    fn null_bool_and_containers_are_skipped() {
        let raw = json!({"a": "  ", "b": {"c": "x"}});
        assert_eq!(first_text_at(&raw, &PATHS), Some((1, "x".to_string())));
        let raw = json!({"a": null, "b": {"c": true}, "d": {"e": {"f": ["x"]}}});
        assert_eq!(first_text(&raw, &PATHS), None);
        assert_eq!(first_text(&json!("just a string"), &PATHS), None);
    }

    #[test]
    fn objects_arrays_and_numbers() {
        let raw = json!({"a": [1, 2], "b": {"c": {"k": 1}}, "n": "4.5"});
        assert!(first_object(&raw, &PATHS).unwrap().contains_key("k"));
        assert_eq!(first_array(&raw, &PATHS).unwrap().len(), 2);
        assert_eq!(first_number(&raw, &field_paths!["x", "n"]), Some(4.5));
        assert_eq!(first_number(&json!({"n": "n/a"}), &field_paths!["n"]), None);
    }

    #[test]
    fn displays_dotted() {
        assert_eq!(PATHS[2].to_string(), "d.e.f");
        assert_eq!(FieldPath::new(&[]).to_string(), "<root>");
    }
}
