use crate::error::{ValidationError, Violation, ViolationKind};
use crate::schema::Schema;
use serde_json::Value;
use tracing::{debug, warn};

pub mod path;
mod references;
mod structural;

pub use path::{FieldPath, PathSegment};
use structural::SchemaWalker;

/// Validates untyped schema candidates against the attribute schema grammar.
///
/// A `Validator` holds only its options, so one instance can be shared and reused
/// across threads for any number of candidates.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    strict: bool,
    detect_cycles: bool,
}

#[derive(Debug, Clone)]
pub struct ValidatorBuilder {
    strict: bool,
    detect_cycles: bool,
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self {
            strict: false,
            detect_cycles: true,
        }
    }
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects object keys that are not part of the grammar instead of dropping them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Toggles detection of dependency cycles between attribute conditions.
    /// Conditions that refer to their own attribute are rejected either way.
    pub fn detect_cycles(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            strict: self.strict,
            detect_cycles: self.detect_cycles,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        ValidatorBuilder::default().build()
    }
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validates a candidate value and returns the typed schema.
    ///
    /// All violations are collected in a single pass; the error lists every one of them.
    /// Nothing is coerced: a numeric string is not a number and `null` is never a value.
    pub fn validate(&self, value: &Value) -> Result<Schema, ValidationError> {
        let mut walker = SchemaWalker::new(self.strict);
        walker.walk_schema(value);

        let mut violations = walker.violations;
        references::check_unique(&walker.solution_ids, "solution id", &mut violations);
        for solution in &walker.solutions {
            debug!(
                solution = %solution.path,
                attributes = solution.attributes.len(),
                references = solution.references.len(),
                "checking solution references"
            );
            references::check_solution(solution, self.detect_cycles, &mut violations);
        }

        if !violations.is_empty() {
            warn!(count = violations.len(), "schema rejected");
            return Err(ValidationError::new(violations));
        }

        // The walk above guarantees the shape, so this only fails on grammar drift.
        serde_json::from_value(value.clone()).map_err(|e| {
            ValidationError::new(vec![Violation::new(
                ViolationKind::Structural,
                FieldPath::root(),
                e.to_string(),
            )])
        })
    }

    /// Re-validates an already typed schema, e.g. one assembled in code.
    pub fn validate_schema(&self, schema: &Schema) -> Result<Schema, ValidationError> {
        let value = serde_json::to_value(schema).map_err(|e| {
            ValidationError::new(vec![Violation::new(
                ViolationKind::Structural,
                FieldPath::root(),
                e.to_string(),
            )])
        })?;
        self.validate(&value)
    }
}

/// Validates a candidate with the default options.
pub fn validate(value: &Value) -> Result<Schema, ValidationError> {
    Validator::default().validate(value)
}
