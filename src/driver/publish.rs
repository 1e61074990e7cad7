use crate::error::PublishError;
use crate::schema::Schema;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Confirmation returned by a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub schema_id: String,
    pub version: String,
}

/// A destination schemas can be published to.
pub trait Publisher: Send + Sync {
    fn publish(&self, schema: &Schema, version: &str) -> Result<PublishReceipt, PublishError>;
}

/// Stands in for the hosting platform: waits for `delay`, then accepts the schema.
#[derive(Debug, Clone)]
pub struct MockPublisher {
    delay: Duration,
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

impl MockPublisher {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Publisher for MockPublisher {
    fn publish(&self, schema: &Schema, version: &str) -> Result<PublishReceipt, PublishError> {
        if version.trim().is_empty() {
            return Err(PublishError::Rejected("version must not be empty".to_string()));
        }
        info!(schema = %schema.id, version, "publishing schema");
        thread::sleep(self.delay);
        Ok(PublishReceipt {
            schema_id: schema.id.clone(),
            version: version.to_string(),
        })
    }
}

/// Project metadata file the publish version is read from.
pub const METADATA_FILE_NAME: &str = "package.json";

/// The parts of the project manifest the publish step needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub name: Option<String>,
    pub version: String,
}

impl ProjectMetadata {
    /// Reads `package.json` from the project directory.
    pub fn read(dir: &Path) -> Result<Self, PublishError> {
        let path = dir.join(METADATA_FILE_NAME);
        let content = fs::read_to_string(&path).map_err(|e| {
            PublishError::Metadata(format!("could not read '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PublishError::Metadata(format!("invalid '{}': {}", path.display(), e))
        })
    }
}
