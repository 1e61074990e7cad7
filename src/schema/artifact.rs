use super::Schema;
use crate::error::DriverError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted schema artifact.
pub const SCHEMA_FILE_NAME: &str = "schema.json";

/// A validated schema ready to be persisted.
#[derive(Debug, Clone)]
pub struct SchemaArtifact {
    pub schema: Schema,
}

impl SchemaArtifact {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Serializes the schema as compact JSON.
    pub fn to_json(&self) -> Result<String, DriverError> {
        Ok(serde_json::to_string(&self.schema)?)
    }

    /// Writes `schema.json` into `dir` and returns the written path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, DriverError> {
        let path = dir.join(SCHEMA_FILE_NAME);
        let json = self.to_json()?;
        fs::write(&path, json).map_err(|source| DriverError::Artifact {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Loads a previously written artifact. The content is trusted to be a validated schema.
    pub fn from_file(path: &Path) -> Result<Self, DriverError> {
        let bytes = fs::read(path).map_err(|source| DriverError::Artifact {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DriverError> {
        let schema = serde_json::from_slice(bytes)?;
        Ok(Self { schema })
    }
}
