use super::ConditionTrace;

/// Formats condition traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a condition trace into a one-line explanation.
    pub fn format_trace(trace: &ConditionTrace) -> String {
        Self::format_recursive(trace, 0)
    }

    /// Formats a top-level condition list, which is an implicit AND.
    pub fn format_all(traces: &[ConditionTrace]) -> String {
        let parent = if traces.len() > 1 { 2 } else { 0 };
        traces
            .iter()
            .filter(|t| !matches!(t, ConditionTrace::NotEvaluated))
            .map(|t| Self::format_recursive(t, parent))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Recursively formats the trace, adding parentheses only when necessary.
    fn format_recursive(trace: &ConditionTrace, parent_precedence: u8) -> String {
        let current_precedence = trace.precedence();
        let needs_parens = current_precedence < parent_precedence;

        let body = match trace {
            ConditionTrace::Group {
                operator, children, ..
            } => {
                // Short-circuited children are left out; only the decisive part is shown.
                let shown: Vec<&ConditionTrace> = children
                    .iter()
                    .filter(|c| !matches!(c, ConditionTrace::NotEvaluated))
                    .collect();
                if let [only] = shown.as_slice() {
                    // The group collapses into its child, which then answers to our parent.
                    return Self::format_recursive(only, parent_precedence);
                }
                shown
                    .iter()
                    .map(|c| Self::format_recursive(c, current_precedence))
                    .collect::<Vec<_>>()
                    .join(&format!(" {} ", operator.symbol()))
            }
            ConditionTrace::Leaf {
                attribute_id,
                expected,
                actual,
                ..
            } => {
                let was = match actual {
                    Some(value) => value.to_string(),
                    None => "unset".to_string(),
                };
                format!("{} == {} (was {})", attribute_id, expected, was)
            }
            ConditionTrace::NotEvaluated => String::new(),
        };

        if needs_parens {
            format!("({})", body)
        } else {
            body
        }
    }
}
