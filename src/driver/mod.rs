//! The build/publish pipeline: load a schema source, validate it, write `schema.json`
//! and optionally publish it. Every stage aborts the ones after it on failure.

use crate::error::DriverError;
use crate::schema::{Schema, SchemaArtifact};
use crate::validator::Validator;
use std::path::{Path, PathBuf};
use tracing::info;

mod loader;
mod publish;

pub use loader::{SourceFormat, load_source, parse_source};
pub use publish::{METADATA_FILE_NAME, MockPublisher, ProjectMetadata, PublishReceipt, Publisher};

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub schema: Schema,
    pub artifact_path: PathBuf,
}

/// Loads `src`, validates it and writes `schema.json` into `out_dir`.
pub fn build(
    src: &Path,
    out_dir: &Path,
    validator: &Validator,
) -> Result<BuildOutput, DriverError> {
    info!(src = %src.display(), "loading schema source");
    let value = load_source(src)?;

    info!(strict = validator.is_strict(), "validating schema");
    let schema = validator.validate(&value)?;

    let artifact = SchemaArtifact::new(schema);
    let artifact_path = artifact.save(out_dir)?;
    info!(path = %artifact_path.display(), "schema artifact written");

    Ok(BuildOutput {
        schema: artifact.schema,
        artifact_path,
    })
}

/// Publishes a built schema under `version`.
pub fn publish(
    output: &BuildOutput,
    version: &str,
    publisher: &dyn Publisher,
) -> Result<PublishReceipt, DriverError> {
    let receipt = publisher.publish(&output.schema, version)?;
    info!(schema = %receipt.schema_id, version = %receipt.version, "schema published");
    Ok(receipt)
}
