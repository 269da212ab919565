//! Profile values
//!
//! A profile is a flat mapping from feature name to a scalar value. Request
//! bodies and corpus rows are both decoded from JSON objects; `null` and
//! nested values are treated as absent.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A single feature value: free text or a number (binary flags are 0/1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Decode a JSON scalar. Booleans become 0/1, `null` and containers are absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(FeatureValue::Number),
            Value::Bool(b) => Some(FeatureValue::Number(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => Some(FeatureValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric view. Text parses when it holds a finite number.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        number.filter(|n| n.is_finite())
    }

    /// Text view. Integral numbers render without a fractional part so
    /// `5` and `5.0` both produce `"5"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FeatureValue::Text(s) => Cow::Borrowed(s.as_str()),
            FeatureValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            FeatureValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FeatureValue::Text(_))
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

/// A user's declared attributes keyed by feature name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    values: AHashMap<String, FeatureValue>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from a JSON object, skipping absent values
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let values = map
            .iter()
            .filter_map(|(k, v)| FeatureValue::from_json(v).map(|fv| (k.clone(), fv)))
            .collect();
        Self { values }
    }

    /// Keep only the listed fields
    pub fn select<S: AsRef<str>>(&self, fields: &[S]) -> Self {
        let values = fields
            .iter()
            .filter_map(|f| {
                let f = f.as_ref();
                self.values.get(f).map(|v| (f.to_string(), v.clone()))
            })
            .collect();
        Self { values }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.values.iter()
    }
}
