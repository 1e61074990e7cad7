//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the attrschema crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use attrschema::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let candidate = attrschema::driver::load_source(Path::new("attributes.json"))?;
//! let schema = Validator::builder().strict(true).build().validate(&candidate)?;
//!
//! for solution in &schema.solutions {
//!     let assignment = Assignment::defaults(solution);
//!     let report = Visibility::new(solution).resolve(&assignment, Some(NodeType::DynamoList))?;
//!     println!("{}: {:?}", solution.id, report.attributes);
//! }
//! # Ok(())
//! # }
//! ```

// Validation
pub use crate::validator::{FieldPath, Validator, ValidatorBuilder};

// Schema model
pub use crate::schema::{
    Attribute, AttributeGroup, AttributeInput, AttributeNode, Condition, ConditionValue,
    DropdownOption, NodeType, Operator, Schema, SchemaArtifact, ScriptLocation, ScriptRef,
    Solution,
};

// Evaluation
pub use crate::evaluator::{Assignment, AttributeValue, Visibility, VisibilityReport};

// Error types
pub use crate::error::{EvaluationError, ValidationError, Violation, ViolationKind};

// Trace formatting
pub use crate::trace::{ConditionTrace, TraceFormatter};

pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
