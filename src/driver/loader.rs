use crate::error::LoadError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads a schema source document into an untyped value, ready for validation.
///
/// `.json` files are parsed with `serde_json`, `.yaml`/`.yml` files with `serde_yaml`.
pub fn load_source(path: &Path) -> Result<Value, LoadError> {
    let format = SourceFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(&content, format, path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(SourceFormat::Json),
            Some("yaml") | Some("yml") => Ok(SourceFormat::Yaml),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses already-read source text. `origin` is only used in error messages.
pub fn parse_source(
    content: &str,
    format: SourceFormat,
    origin: &Path,
) -> Result<Value, LoadError> {
    let parse_error = |message: String| LoadError::Parse {
        path: origin.to_path_buf(),
        message,
    };
    let value: Value = match format {
        SourceFormat::Json => {
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
        }
        SourceFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
        }
    };
    if value.is_null() {
        return Err(LoadError::MissingSchema(origin.to_path_buf()));
    }
    Ok(value)
}
