//! End-to-end orchestration for one natural-language query:
//! convert → ask the model → decode the call → dispatch it.

use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::client::FunctionCallProvider;
use crate::config::BridgeConfig;
use crate::dispatch::CallDispatcher;
use crate::openapi::ApiDescription;
use crate::schema::{ConversionReport, ToolSchemaConverter};
use crate::types::tool::{FunctionCall, FunctionCallOutcome, Tool};
use crate::Result;

/// Result of [`Bridge::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutcome {
    /// The model picked `call` and the API answered with `body`.
    Executed { call: FunctionCall, body: String },
    /// The model did not pick any function; nothing was dispatched.
    NoCall { text: Option<String> },
}

/// Holds the converted tool list, a model provider and a dispatcher.
///
/// Conversion happens once at construction. Each query then runs its steps
/// strictly in order; independent queries may run concurrently.
#[derive(Debug)]
pub struct Bridge {
    report: ConversionReport,
    provider: Arc<dyn FunctionCallProvider>,
    dispatcher: CallDispatcher,
}

impl Bridge {
    pub fn new(
        description: &ApiDescription,
        converter: &ToolSchemaConverter,
        provider: Arc<dyn FunctionCallProvider>,
        dispatcher: CallDispatcher,
    ) -> Self {
        let report = converter.convert_with_report(description);
        info!(
            tools = report.tools.len(),
            skipped = report.skipped.len(),
            "tool schema ready"
        );
        Self {
            report,
            provider,
            dispatcher,
        }
    }

    /// Fetch the description from the configured endpoint and wire up a
    /// network-backed client and dispatcher.
    ///
    /// `api_key: None` falls back to the keyring / `GEMINI_API_KEY`.
    pub async fn from_config(config: &BridgeConfig, api_key: Option<String>) -> Result<Self> {
        let mut builder = config.client_builder();
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        // Credential first: no network activity with a bad key.
        let client = builder.build()?;

        let options = config.transport_options();
        let description = ApiDescription::fetch(&config.description_url(), &options).await?;
        let dispatcher = CallDispatcher::with_options(&description, &config.api_base_url, &options)?;

        Ok(Self::new(
            &description,
            &config.converter(),
            Arc::new(client),
            dispatcher,
        ))
    }

    pub fn tools(&self) -> &[Tool] {
        &self.report.tools
    }

    pub fn report(&self) -> &ConversionReport {
        &self.report
    }

    pub fn dispatcher(&self) -> &CallDispatcher {
        &self.dispatcher
    }

    /// Ask the model only; nothing is dispatched.
    pub async fn suggest(&self, query: &str) -> Result<FunctionCallOutcome> {
        self.provider.suggest(query, &self.report.tools).await
    }

    pub async fn run(&self, query: &str) -> Result<BridgeOutcome> {
        let span = info_span!("bridge_query", query_id = %Uuid::new_v4());
        async move {
            match self.suggest(query).await? {
                FunctionCallOutcome::Call(call) => {
                    let body = self.dispatcher.dispatch(&call).await?;
                    info!(function = call.name.as_str(), bytes = body.len(), "query answered");
                    Ok(BridgeOutcome::Executed { call, body })
                }
                FunctionCallOutcome::NoCall { text, .. } => Ok(BridgeOutcome::NoCall { text }),
            }
        }
        .instrument(span)
        .await
    }
}
