use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::credential::Credential;
use super::gemini::{self, GenerateContentRequest};
use super::provider::FunctionCallProvider;
use crate::transport::{HttpTransport, TransportError};
use crate::types::tool::{FunctionCallOutcome, Tool};
use crate::{Error, ErrorContext, Result};

/// Client for the model provider's content-generation endpoint.
///
/// Construct through [`FunctionCallClientBuilder`](super::FunctionCallClientBuilder);
/// the credential is validated there before any HTTP client exists.
#[derive(Debug, Clone)]
pub struct FunctionCallClient {
    pub(crate) transport: HttpTransport,
    pub(crate) credential: Credential,
    pub(crate) base_url: String,
    pub(crate) model: String,
}

impl FunctionCallClient {
    pub fn builder() -> super::FunctionCallClientBuilder {
        super::FunctionCallClientBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{base}/models/{model}:generateContent`, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Ask the model which declared function answers `query`.
    pub async fn get_function_call(
        &self,
        query: &str,
        tools: &[Tool],
    ) -> Result<FunctionCallOutcome> {
        let tools = serde_json::to_value(tools)?;
        self.send(query, &tools).await
    }

    /// Same as [`get_function_call`](Self::get_function_call) with the tool
    /// schema already serialized (the array produced by
    /// [`tools_to_json`](crate::schema::tools_to_json)).
    pub async fn get_function_call_json(
        &self,
        query: &str,
        tools_json: &str,
    ) -> Result<FunctionCallOutcome> {
        let tools: Value = serde_json::from_str(tools_json).map_err(|e| {
            Error::malformed_input(
                format!("tool schema is not valid JSON: {}", e),
                ErrorContext::new().with_source("function_call_client"),
            )
        })?;
        if !tools.is_array() {
            return Err(Error::malformed_input(
                "tool schema must be a JSON array of tool objects",
                ErrorContext::new()
                    .with_field_path("tools")
                    .with_source("function_call_client"),
            ));
        }
        self.send(query, &tools).await
    }

    async fn send(&self, query: &str, tools: &Value) -> Result<FunctionCallOutcome> {
        let request_id = Uuid::new_v4().to_string();
        let body = GenerateContentRequest::single_turn(query, tools);
        debug!(
            request_id = request_id.as_str(),
            model = self.model.as_str(),
            tools = tools.as_array().map(|a| a.len()).unwrap_or(0),
            "requesting function call"
        );

        let request = self
            .transport
            .client()
            .post(self.endpoint())
            .query(&[("key", self.credential.expose())])
            .json(&body);
        let response = self
            .transport
            .send(request, Some(&request_id))
            .await
            .map_err(redact_url)?;

        if !response.is_success() {
            warn!(
                request_id = request_id.as_str(),
                status = response.status,
                "model provider returned an error"
            );
            return Err(Error::Upstream {
                status: response.status,
                body: response.body,
            });
        }

        let outcome = gemini::parse_response(&response.body)?;
        match &outcome {
            FunctionCallOutcome::Call(call) => info!(
                request_id = request_id.as_str(),
                function = call.name.as_str(),
                "model suggested a function call"
            ),
            FunctionCallOutcome::NoCall { finish_reason, .. } => info!(
                request_id = request_id.as_str(),
                finish_reason = finish_reason.as_deref().unwrap_or("-"),
                "model answered without a function call"
            ),
        }
        Ok(outcome)
    }
}

/// The request URL carries the key as `?key=`; keep it out of error text.
fn redact_url(err: Error) -> Error {
    match err {
        Error::Transport(TransportError::Http(e)) => {
            Error::Transport(TransportError::Http(e.without_url()))
        }
        other => other,
    }
}

#[async_trait]
impl FunctionCallProvider for FunctionCallClient {
    async fn suggest(&self, query: &str, tools: &[Tool]) -> Result<FunctionCallOutcome> {
        self.get_function_call(query, tools).await
    }
}
