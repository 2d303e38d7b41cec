//! Bridge configuration
//!
//! Values come from defaults, then an optional YAML file, then `FNCALL_*`
//! environment variables (env wins).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::client::{FunctionCallClientBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::schema::{ExclusionMode, ToolSchemaConverter};
use crate::transport::http::DEFAULT_TIMEOUT_SECS;
use crate::transport::TransportOptions;
use crate::{Error, ErrorContext, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Path of the description endpoint relative to the API base URL.
pub const DEFAULT_DESCRIPTION_PATH: &str = "/v3/api-docs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL of the target service; dispatched calls go here.
    pub api_base_url: String,
    /// Where to fetch the API description. Defaults to `{api_base_url}/v3/api-docs`.
    pub description_url: Option<String>,
    pub model: String,
    pub provider_base_url: String,
    /// Bound on each network round trip (model call, dispatched call, description fetch).
    pub timeout_secs: u64,
    pub proxy_url: Option<String>,
    pub exclusion_mode: ExclusionMode,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            description_url: None,
            model: DEFAULT_MODEL.to_string(),
            provider_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy_url: None,
            exclusion_mode: ExclusionMode::default(),
        }
    }
}

impl BridgeConfig {
    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid bridge config: {}", e),
                ErrorContext::new().with_source("bridge_config"),
            )
        })
    }

    /// YAML file overridden by the environment.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml_str(&content)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `FNCALL_*` overrides using `lookup` as the variable source.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("FNCALL_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("FNCALL_DESCRIPTION_URL") {
            self.description_url = Some(v);
        }
        if let Some(v) = lookup("FNCALL_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("FNCALL_PROVIDER_BASE_URL") {
            self.provider_base_url = v;
        }
        if let Some(v) = lookup("FNCALL_HTTP_TIMEOUT_SECS") {
            self.timeout_secs = v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid_env("FNCALL_HTTP_TIMEOUT_SECS", &v))?;
        }
        if let Some(v) = lookup("FNCALL_PROXY_URL") {
            self.proxy_url = Some(v);
        }
        if let Some(v) = lookup("FNCALL_EXCLUSION_MODE") {
            self.exclusion_mode = v
                .parse::<ExclusionMode>()
                .map_err(|_| invalid_env("FNCALL_EXCLUSION_MODE", &v))?;
        }
        Ok(self)
    }

    pub fn description_url(&self) -> String {
        self.description_url.clone().unwrap_or_else(|| {
            format!(
                "{}{}",
                self.api_base_url.trim_end_matches('/'),
                DEFAULT_DESCRIPTION_PATH
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn transport_options(&self) -> TransportOptions {
        let options = TransportOptions::default().with_timeout(self.timeout());
        match &self.proxy_url {
            Some(proxy) => options.with_proxy_url(proxy.clone()),
            None => options,
        }
    }

    /// Client builder preloaded with model, base URL, timeout and proxy.
    /// The credential still comes from the caller or the environment.
    pub fn client_builder(&self) -> FunctionCallClientBuilder {
        let builder = FunctionCallClientBuilder::new()
            .model(self.model.clone())
            .base_url(self.provider_base_url.clone())
            .timeout(self.timeout());
        match &self.proxy_url {
            Some(proxy) => builder.proxy_url(proxy.clone()),
            None => builder,
        }
    }

    pub fn converter(&self) -> ToolSchemaConverter {
        ToolSchemaConverter::new().with_exclusion_mode(self.exclusion_mode)
    }
}

fn invalid_env(key: &str, value: &str) -> Error {
    Error::configuration_with_context(
        format!("invalid value for {}", key),
        ErrorContext::new()
            .with_field_path(key)
            .with_details(value)
            .with_source("bridge_config"),
    )
}
