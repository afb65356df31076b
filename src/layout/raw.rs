//! User-facing layoutData shorthand
//!
//! Applications write layoutData loosely: numbers, percentage strings,
//! selector strings, widget handles and two-element arrays. `RawLayout`
//! holds that input untouched until the codec validates it.

use std::collections::BTreeMap;

use serde_json::Value;

use super::error::LayoutError;
use super::types::WidgetId;

/// A single, unvalidated layoutData value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Treated as an absent edge
    Null,
    Bool(bool),
    Number(f64),
    /// Percentage, selector, `prev()` or `next()`
    Text(String),
    Widget(WidgetId),
    Array(Vec<RawValue>),
    Object(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// `[first, offset]`
    pub fn pair(first: impl Into<RawValue>, offset: f64) -> Self {
        RawValue::Array(vec![first.into(), RawValue::Number(offset)])
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Convert a JSON value; `{"widget": "<cid>"}` becomes a widget handle
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Null),
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Array(items) => RawValue::Array(items.iter().map(RawValue::from_json).collect()),
            Value::Object(map) => {
                if let (1, Some(Value::String(cid))) = (map.len(), map.get("widget")) {
                    return RawValue::Widget(WidgetId::new(cid.clone()));
                }
                RawValue::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), RawValue::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Inverse of [`RawValue::from_json`]
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            RawValue::Text(s) => Value::String(s.clone()),
            RawValue::Widget(id) => serde_json::json!({ "widget": id.as_str() }),
            RawValue::Array(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
            RawValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<WidgetId> for RawValue {
    fn from(id: WidgetId) -> Self {
        RawValue::Widget(id)
    }
}

impl From<&WidgetId> for RawValue {
    fn from(id: &WidgetId) -> Self {
        RawValue::Widget(id.clone())
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        RawValue::Array(items)
    }
}

/// Unvalidated layoutData: edge name to value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLayout {
    entries: BTreeMap<String, RawValue>,
}

impl RawLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Whether `key` is present with a non-null value
    pub fn has(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand a named preset (`center`, `stretch`, `fill`)
    pub fn preset(name: &str) -> Option<RawLayout> {
        match name {
            "center" => Some(RawLayout::new().with("centerX", 0).with("centerY", 0)),
            "stretch" | "fill" => Some(
                RawLayout::new()
                    .with("left", 0)
                    .with("top", 0)
                    .with("right", 0)
                    .with("bottom", 0),
            ),
            _ => None,
        }
    }

    /// Build from a JSON object or a preset name
    pub fn from_json(value: &Value) -> Result<RawLayout, LayoutError> {
        match value {
            Value::Object(map) => Ok(RawLayout {
                entries: map
                    .iter()
                    .map(|(k, v)| (k.clone(), RawValue::from_json(v)))
                    .collect(),
            }),
            Value::String(name) => {
                RawLayout::preset(name).ok_or_else(|| LayoutError::unknown_preset(name))
            }
            Value::Null => Ok(RawLayout::new()),
            _ => Err(LayoutError::NotAnObject),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawLayout {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let raw = RawLayout::from_json(&json!({
            "left": 10,
            "top": ["#title", 8],
            "right": "30%",
            "baseline": {"widget": "$4"},
        }))
        .unwrap();
        assert_eq!(raw.get("left"), Some(&RawValue::Number(10.0)));
        assert_eq!(raw.get("top"), Some(&RawValue::pair("#title", 8.0)));
        assert_eq!(raw.get("right"), Some(&RawValue::Text("30%".to_string())));
        assert_eq!(
            raw.get("baseline"),
            Some(&RawValue::Widget(WidgetId::from("$4")))
        );
    }

    #[test]
    fn test_plain_object_stays_object() {
        let raw = RawLayout::from_json(&json!({"left": {}})).unwrap();
        assert!(matches!(raw.get("left"), Some(RawValue::Object(_))));
        let raw = RawLayout::from_json(&json!({"left": {"widget": 3}})).unwrap();
        assert!(matches!(raw.get("left"), Some(RawValue::Object(_))));
    }

    #[test]
    fn test_presets() {
        let center = RawLayout::from_json(&json!("center")).unwrap();
        assert_eq!(center, RawLayout::new().with("centerX", 0).with("centerY", 0));
        assert_eq!(RawLayout::preset("fill"), RawLayout::preset("stretch"));
        assert!(RawLayout::from_json(&json!("middle")).is_err());
        assert!(RawLayout::from_json(&json!(12)).is_err());
    }

    #[test]
    fn test_null_is_absent() {
        let raw = RawLayout::new().with("left", RawValue::Null).with("top", 0);
        assert!(!raw.has("left"));
        assert!(raw.has("top"));
    }

    #[test]
    fn test_json_roundtrip() {
        let value = json!({"left": ["prev()", 4.0], "baseline": {"widget": "$9"}});
        let raw = RawLayout::from_json(&value).unwrap();
        assert_eq!(raw.to_json(), value);
    }
}
