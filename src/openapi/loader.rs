//! Loading an [`ApiDescription`] from strings, local files, or a live
//! description endpoint (e.g. springdoc's `/v3/api-docs`).

use super::{ApiDescription, DescriptionError};
use crate::transport::{HttpTransport, TransportOptions};
use std::path::Path;
use tracing::debug;

impl ApiDescription {
    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, DescriptionError> {
        serde_json::from_str(content)
            .map_err(|e| DescriptionError::Malformed(format!("invalid JSON description: {}", e)))
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, DescriptionError> {
        serde_yaml::from_str(content)
            .map_err(|e| DescriptionError::Malformed(format!("invalid YAML description: {}", e)))
    }

    /// Load from a local file. `.yaml`/`.yml` are parsed as YAML, anything
    /// else as JSON.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DescriptionError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DescriptionError::LoadError {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
                hint: Some("Check if the file exists and you have read permissions.".to_string()),
            })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        debug!(path = %path.display(), yaml = is_yaml, "loading API description");
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Fetch from a running service.
    pub async fn fetch(url: &str, options: &TransportOptions) -> Result<Self, DescriptionError> {
        let transport = HttpTransport::new(options).map_err(|e| DescriptionError::LoadError {
            path: url.to_string(),
            reason: format!("failed to create HTTP client: {}", e),
            hint: None,
        })?;

        debug!(url, "fetching API description");
        let response = transport
            .send(transport.client().get(url), None)
            .await
            .map_err(|e| {
                DescriptionError::LoadError {
                    path: url.to_string(),
                    reason: format!("HTTP request failed: {}", e),
                    hint: None,
                }
                .with_hint("Check that the service is running and exposes its API description.")
            })?;

        if !response.is_success() {
            return Err(DescriptionError::LoadError {
                path: url.to_string(),
                reason: format!("HTTP {}", response.status),
                hint: None,
            });
        }

        Self::from_json_str(&response.body)
    }
}
