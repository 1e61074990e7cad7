//! # attrschema - Attribute Schema Validation and Condition Evaluation
//!
//! **attrschema** defines the declarative schema used to describe pluggable attributes
//! of a visual page builder: solutions, the scripts they load, their attributes and
//! attribute groups, and the boolean condition trees deciding when each one applies.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Read an untyped schema candidate (JSON or YAML) into a `serde_json::Value`.
//! 2.  **Validate**: Run a `Validator` over it. Every violation is collected in one pass and
//!     returned together, each with the path to the offending value.
//! 3.  **Persist**: Write the typed `Schema` to `schema.json` with `SchemaArtifact`.
//! 4.  **Evaluate**: Decide conditions against an `Assignment` of attribute values, or resolve
//!     the visibility of a whole solution with `Visibility`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use attrschema::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let candidate = json!({
//!         "id": "fs-attributes",
//!         "name": "Attributes",
//!         "solutions": [{
//!             "id": "cmsload",
//!             "name": "CMS Load",
//!             "scripts": [],
//!             "attributes": [
//!                 {
//!                     "type": "attribute", "id": "element", "name": "Element",
//!                     "description": "Type of element", "attributeName": "fs-cmsload-element",
//!                     "optionsType": "dropdown", "attributeValue": "list",
//!                     "options": [{ "name": "List", "description": "A list", "attributeValue": "list" }]
//!                 },
//!                 {
//!                     "type": "group", "name": "List settings",
//!                     "conditions": [{ "type": "condition", "attributeId": "element", "attributeValue": "list" }],
//!                     "attributes": [{
//!                         "type": "attribute", "id": "duration", "name": "Duration",
//!                         "description": "Animation duration", "attributeName": "fs-cmsload-duration",
//!                         "optionsType": "integer-input", "attributeValue": 500
//!                     }]
//!                 }
//!             ]
//!         }]
//!     });
//!
//!     let schema = Validator::default().validate(&candidate)?;
//!     let solution = &schema.solutions[0];
//!
//!     let assignment = Assignment::defaults(solution);
//!     let report = Visibility::new(solution).resolve(&assignment, None)?;
//!     assert!(report.is_group_visible("List settings"));
//!     Ok(())
//! }
//! ```

pub mod driver;
pub mod error;
pub mod evaluator;
pub mod prelude;
pub mod schema;
pub mod trace;
pub mod validator;

pub use validator::validate;
