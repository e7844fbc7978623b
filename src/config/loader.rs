//! Load api manifests from JSON text or files.

use crate::config::Manifest;
use crate::error::ConfigError;
use std::path::Path;

pub fn parse_manifest(json: &str) -> Result<Manifest, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

pub async fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let manifest = parse_manifest(&text)?;
    tracing::debug!(path = %path.display(), resources = manifest.resources.len(), "loaded api manifest");
    Ok(manifest)
}
