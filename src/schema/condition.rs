use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Deepest condition nesting the validator accepts, matching `serde_json`'s parser limit.
pub const MAX_CONDITION_DEPTH: usize = 128;

/// A boolean condition tree deciding whether an attribute or group applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    /// Compares the current value of one attribute against a fixed value.
    #[serde(rename = "condition", rename_all = "camelCase")]
    Leaf {
        attribute_id: String,
        attribute_value: ConditionValue,
    },
    /// Combines nested conditions with a logical operator.
    #[serde(rename = "group")]
    Group {
        operator: Operator,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn leaf(attribute_id: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::Leaf {
            attribute_id: attribute_id.into(),
            attribute_value: value.into(),
        }
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::Group {
            operator: Operator::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Group {
            operator: Operator::Or,
            conditions,
        }
    }

    /// Collects the ids of every attribute this tree reads, in first-seen order.
    pub fn referenced_attributes<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Condition::Leaf { attribute_id, .. } => {
                if !ids.contains(&attribute_id.as_str()) {
                    ids.push(attribute_id.as_str());
                }
            }
            Condition::Group { conditions, .. } => {
                for condition in conditions {
                    condition.referenced_attributes(ids);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub const ALL: [&'static str; 2] = ["and", "or"];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

/// The value a condition leaf compares against: a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Number(Number),
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value.into())
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Text(s) => write!(f, "\"{}\"", s),
            ConditionValue::Number(n) => write!(f, "{}", n),
        }
    }
}
