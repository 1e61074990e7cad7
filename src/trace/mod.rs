pub mod formatter;

pub use formatter::TraceFormatter;

use crate::evaluator::AttributeValue;
use crate::schema::{ConditionValue, Operator};

/// A record of how a condition tree was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTrace {
    Group {
        operator: Operator,
        children: Vec<ConditionTrace>,
        outcome: bool,
    },
    Leaf {
        attribute_id: String,
        expected: ConditionValue,
        actual: Option<AttributeValue>,
        outcome: bool,
    },
    /// A branch skipped by short-circuiting.
    NotEvaluated,
}

impl ConditionTrace {
    pub fn outcome(&self) -> bool {
        match self {
            ConditionTrace::Group { outcome, .. } | ConditionTrace::Leaf { outcome, .. } => {
                *outcome
            }
            ConditionTrace::NotEvaluated => false,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            ConditionTrace::Group { operator, .. } => match operator {
                Operator::Or => 1,
                Operator::And => 2,
            },
            ConditionTrace::Leaf { .. } | ConditionTrace::NotEvaluated => 9,
        }
    }
}
