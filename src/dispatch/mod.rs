//! Function call → real API invocation.
//!
//! The dispatcher owns an immutable `operationId -> route` table built once
//! from the same [`ApiDescription`] the converter reads, so every tool the
//! model can pick has a route. It is `Send + Sync` and can serve concurrent
//! calls without locking.

pub mod route;

pub use route::{arg_to_string, OperationRoute, PreparedRequest};

use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::openapi::{ApiDescription, HttpMethod};
use crate::transport::{HttpTransport, TransportOptions};
use crate::types::tool::FunctionCall;
use crate::{Error, ErrorContext, Result};

#[derive(Debug, Clone)]
pub struct CallDispatcher {
    base_url: Url,
    routes: HashMap<String, OperationRoute>,
    transport: HttpTransport,
}

impl CallDispatcher {
    /// Build with default transport options.
    pub fn new(description: &ApiDescription, base_url: &str) -> Result<Self> {
        Self::with_options(description, base_url, &TransportOptions::default())
    }

    /// Build the route table. Fails on a duplicate `operationId` or an
    /// unusable base URL.
    pub fn with_options(
        description: &ApiDescription,
        base_url: &str,
        options: &TransportOptions,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid API base URL: {}", e),
                ErrorContext::new()
                    .with_details(base_url)
                    .with_source("call_dispatcher"),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration_with_context(
                "API base URL cannot carry a path",
                ErrorContext::new()
                    .with_details(base_url.to_string())
                    .with_source("call_dispatcher"),
            ));
        }

        let mut routes = HashMap::new();
        for (path, method, operation) in description.operations() {
            let Some(route) = OperationRoute::from_operation(path, method, operation) else {
                continue;
            };
            if routes.contains_key(&route.operation_id) {
                return Err(Error::DuplicateOperation {
                    operation_id: route.operation_id,
                });
            }
            routes.insert(route.operation_id.clone(), route);
        }
        debug!(routes = routes.len(), base_url = %base_url, "dispatcher ready");

        Ok(Self {
            base_url,
            routes,
            transport: HttpTransport::new(options)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn route(&self, name: &str) -> Option<&OperationRoute> {
        self.routes.get(name)
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Resolve a call to its HTTP request without sending it.
    pub fn prepare(&self, call: &FunctionCall) -> Result<PreparedRequest> {
        let route = self
            .routes
            .get(&call.name)
            .ok_or_else(|| Error::UnknownFunction {
                name: call.name.clone(),
            })?;
        route.prepare(&self.base_url, call)
    }

    /// Execute the operation named by `call` and return the raw response body.
    pub async fn dispatch(&self, call: &FunctionCall) -> Result<String> {
        let prepared = self.prepare(call)?;
        let request_id = Uuid::new_v4().to_string();

        let client = self.transport.client();
        let mut request = client.request(to_reqwest_method(prepared.method), prepared.url.clone());
        for (name, value) in &prepared.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &prepared.body {
            request = request.json(body);
        }

        info!(
            request_id = request_id.as_str(),
            operation = call.name.as_str(),
            method = %prepared.method,
            path = prepared.url.path(),
            "dispatching function call"
        );
        let response = self.transport.send(request, Some(&request_id)).await?;

        if !response.is_success() {
            warn!(
                request_id = request_id.as_str(),
                operation = call.name.as_str(),
                status = response.status,
                "operation returned an error status"
            );
            return Err(Error::Dispatch {
                operation: call.name.clone(),
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}
