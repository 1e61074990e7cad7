use crate::validator::FieldPath;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The category a single validation violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A value has the wrong type or shape, a required field is missing,
    /// or a field is not allowed where it appears.
    Structural,
    /// A condition references an attribute that cannot be resolved,
    /// or conditions depend on each other in a cycle.
    Referential,
    /// An identifier or option value appears more than once in its scope.
    Uniqueness,
    /// A value lies outside of a closed set (node types, input kinds, ...).
    Enumeration,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViolationKind::Structural => "structural",
            ViolationKind::Referential => "referential",
            ViolationKind::Uniqueness => "uniqueness",
            ViolationKind::Enumeration => "enumeration",
        };
        f.write_str(label)
    }
}

/// One problem found while validating a schema candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub path: FieldPath,
    pub reason: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, path: FieldPath, reason: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.path, self.reason)
    }
}

/// Aggregate failure returned by the validator. Holds every violation found in one pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Schema is invalid ({} violation(s)):\n{}", .violations.len(), format_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the violations of a single kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.of_kind(kind).next().is_some()
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors that can occur while resolving attribute visibility.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Conditions form a dependency cycle: {}", .path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("Condition references attribute '{0}', which is not declared in the solution")]
    UnknownAttribute(String),

    #[error("Conditions are nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Errors raised while loading a schema source document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read schema source '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema source '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported schema source '{}': expected a .json, .yaml or .yml file", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Schema source '{}' does not define a schema", .0.display())]
    MissingSchema(PathBuf),
}

/// Errors raised by the publish step.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Could not read project metadata: {0}")]
    Metadata(String),

    #[error("Publish was rejected: {0}")]
    Rejected(String),

    #[error("Publish failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort the build/publish pipeline.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not write schema artifact '{}': {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
