use crate::schema::{Condition, Operator};
use crate::trace::ConditionTrace;

mod assignment;
mod visibility;

pub use assignment::{Assignment, AttributeValue};
pub use visibility::{Visibility, VisibilityReport};

impl Condition {
    /// Decides the condition against the given assignment.
    ///
    /// A leaf holds when the assigned value equals the expected one by type and value;
    /// an unassigned attribute never matches. Groups short-circuit left to right.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        match self {
            Condition::Leaf {
                attribute_id,
                attribute_value,
            } => assignment
                .get(attribute_id)
                .is_some_and(|actual| actual.matches(attribute_value)),
            Condition::Group {
                operator: Operator::And,
                conditions,
            } => conditions.iter().all(|c| c.evaluate(assignment)),
            Condition::Group {
                operator: Operator::Or,
                conditions,
            } => conditions.iter().any(|c| c.evaluate(assignment)),
        }
    }

    /// Evaluates the condition and records every decision taken.
    pub fn trace(&self, assignment: &Assignment) -> ConditionTrace {
        match self {
            Condition::Leaf {
                attribute_id,
                attribute_value,
            } => {
                let actual = assignment.get(attribute_id).cloned();
                let outcome = actual
                    .as_ref()
                    .is_some_and(|value| value.matches(attribute_value));
                ConditionTrace::Leaf {
                    attribute_id: attribute_id.clone(),
                    expected: attribute_value.clone(),
                    actual,
                    outcome,
                }
            }
            Condition::Group {
                operator,
                conditions,
            } => {
                let (children, outcome) = trace_sequence(conditions, *operator, assignment);
                ConditionTrace::Group {
                    operator: *operator,
                    children,
                    outcome,
                }
            }
        }
    }
}

/// Traces conditions under `operator`, marking the ones skipped by short-circuiting.
fn trace_sequence(
    conditions: &[Condition],
    operator: Operator,
    assignment: &Assignment,
) -> (Vec<ConditionTrace>, bool) {
    // `and` stops at the first false child, `or` at the first true one.
    let decisive = operator == Operator::Or;
    let mut children = Vec::with_capacity(conditions.len());
    let mut decided = None;
    for condition in conditions {
        if decided.is_some() {
            children.push(ConditionTrace::NotEvaluated);
            continue;
        }
        let trace = condition.trace(assignment);
        if trace.outcome() == decisive {
            decided = Some(decisive);
        }
        children.push(trace);
    }
    (children, decided.unwrap_or(!decisive))
}

/// Evaluates a condition list attached to a group or attribute. The list is a
/// conjunction; an absent or empty list always holds.
pub fn evaluate_all(conditions: Option<&[Condition]>, assignment: &Assignment) -> bool {
    conditions
        .unwrap_or_default()
        .iter()
        .all(|c| c.evaluate(assignment))
}

/// Traced counterpart of [`evaluate_all`].
pub fn trace_all(conditions: &[Condition], assignment: &Assignment) -> (Vec<ConditionTrace>, bool) {
    trace_sequence(conditions, Operator::And, assignment)
}
