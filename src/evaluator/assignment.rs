use crate::schema::{AttributeInput, ConditionValue, Solution};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// The current value of an attribute while conditions are evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(Number),
    Text(String),
}

impl AttributeValue {
    /// Strict equality against a condition value: same type and same value.
    /// Numbers compare numerically, so `2` equals `2.0`. Flags never match.
    pub fn matches(&self, expected: &ConditionValue) -> bool {
        match (self, expected) {
            (AttributeValue::Text(actual), ConditionValue::Text(expected)) => actual == expected,
            (AttributeValue::Number(actual), ConditionValue::Number(expected)) => {
                numbers_equal(actual, expected)
            }
            (AttributeValue::Text(_), ConditionValue::Number(_))
            | (AttributeValue::Number(_), ConditionValue::Text(_))
            | (AttributeValue::Flag(_), _) => false,
        }
    }
}

/// Integers compare exactly; `f64` is only used once either side is a float.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    if !a.is_f64() && !b.is_f64() {
        // One negative integer and one integer above `i64::MAX`.
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

impl From<Number> for AttributeValue {
    fn from(value: Number) -> Self {
        AttributeValue::Number(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Flag(b) => write!(f, "{}", b),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Maps attribute ids to their current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    values: AHashMap<String, AttributeValue>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the declared default of every attribute of the solution.
    /// Checkboxes and attributes without a default stay unassigned.
    pub fn defaults(solution: &Solution) -> Self {
        let mut assignment = Self::new();
        for (_, attribute) in solution.attributes_flat() {
            let default = match &attribute.input {
                AttributeInput::Dropdown {
                    attribute_value, ..
                }
                | AttributeInput::TextInput { attribute_value } => {
                    attribute_value.clone().map(AttributeValue::Text)
                }
                AttributeInput::IntegerInput { attribute_value }
                | AttributeInput::FloatInput { attribute_value } => {
                    attribute_value.clone().map(AttributeValue::Number)
                }
                AttributeInput::Checkbox => None,
            };
            if let Some(value) = default {
                // First declaration wins, matching reference resolution.
                assignment
                    .values
                    .entry(attribute.id.clone())
                    .or_insert(value);
            }
        }
        assignment
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn unset(&mut self, id: &str) -> Option<AttributeValue> {
        self.values.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&AttributeValue> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut assignment = Self::new();
        for (id, value) in iter {
            assignment.set(id, value);
        }
        assignment
    }
}
