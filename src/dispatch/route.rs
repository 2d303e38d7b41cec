//! One dispatchable operation and the request it turns a call into.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use url::Url;

use crate::openapi::{HttpMethod, OperationSpec, ParameterLocation, ParameterSpec};
use crate::types::tool::FunctionCall;
use crate::{Error, ErrorContext, Result};

static PATH_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}/]+)\}").expect("path placeholder pattern is valid")
});

/// Everything needed to invoke one operation of the target API.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRoute {
    pub operation_id: String,
    pub method: HttpMethod,
    pub path_template: String,
    pub parameters: Vec<ParameterSpec>,
    pub has_request_body: bool,
    pub request_body_required: bool,
}

/// A fully resolved HTTP request, not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OperationRoute {
    /// `None` when the operation has no `operationId`.
    pub fn from_operation(path: &str, method: HttpMethod, operation: &OperationSpec) -> Option<Self> {
        let operation_id = operation.operation_id.clone()?;
        Some(Self {
            operation_id,
            method,
            path_template: path.to_string(),
            parameters: operation.parameters().to_vec(),
            has_request_body: operation.request_body.is_some(),
            request_body_required: operation
                .request_body
                .as_ref()
                .map(|b| b.required)
                .unwrap_or(false),
        })
    }

    /// Resolve `call` against `base_url`.
    ///
    /// Path placeholders are filled and percent-encoded, query and header
    /// parameters are attached, and when the operation takes a request body,
    /// every argument not bound to a declared parameter goes into it.
    pub fn prepare(&self, base_url: &Url, call: &FunctionCall) -> Result<PreparedRequest> {
        let mut consumed: HashSet<&str> = HashSet::new();
        let mut query: Vec<(String, String)> = Vec::new();
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut cookies: Vec<String> = Vec::new();

        for param in &self.parameters {
            consumed.insert(param.name.as_str());
            let Some(value) = call.arg(&param.name) else {
                if param.required || param.location == ParameterLocation::Path {
                    return Err(self.missing(&param.name));
                }
                continue;
            };
            match param.location {
                // Filled in while building the path below.
                ParameterLocation::Path => {}
                // Arrays use the form/explode style: one pair per element.
                ParameterLocation::Query => match value {
                    Value::Array(items) => query.extend(
                        items
                            .iter()
                            .filter(|v| !v.is_null())
                            .map(|v| (param.name.clone(), arg_to_string(v))),
                    ),
                    other => query.push((param.name.clone(), arg_to_string(other))),
                },
                ParameterLocation::Header => {
                    headers.push((param.name.clone(), arg_to_string(value)))
                }
                ParameterLocation::Cookie => {
                    cookies.push(format!("{}={}", param.name, arg_to_string(value)))
                }
            }
        }
        if !cookies.is_empty() {
            headers.push(("cookie".to_string(), cookies.join("; ")));
        }

        let mut url = base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration_with_context(
                    "API base URL cannot carry a path",
                    ErrorContext::new()
                        .with_details(base_url.to_string())
                        .with_source("call_dispatcher"),
                )
            })?;
            segments.pop_if_empty();
            for raw in self.path_template.split('/').filter(|s| !s.is_empty()) {
                let segment = self.fill_placeholders(raw, call, &mut consumed)?;
                segments.push(&segment);
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        let body = if self.has_request_body {
            let rest: Map<String, Value> = call
                .args
                .iter()
                .filter(|(k, v)| !consumed.contains(k.as_str()) && !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if rest.is_empty() && self.request_body_required {
                return Err(self.missing("requestBody"));
            }
            Some(Value::Object(rest))
        } else {
            None
        };

        Ok(PreparedRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }

    fn fill_placeholders<'a>(
        &self,
        segment: &str,
        call: &'a FunctionCall,
        consumed: &mut HashSet<&'a str>,
    ) -> Result<String> {
        let mut out = String::with_capacity(segment.len());
        let mut last = 0;
        for caps in PATH_PLACEHOLDER.captures_iter(segment) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let (key, value) = call
                .args
                .get_key_value(name.as_str())
                .filter(|(_, v)| !v.is_null())
                .ok_or_else(|| self.missing(name.as_str()))?;
            let value = arg_to_string(value);
            if value.is_empty() {
                return Err(self.missing(name.as_str()));
            }
            consumed.insert(key.as_str());
            out.push_str(&segment[last..whole.start()]);
            out.push_str(&value);
            last = whole.end();
        }
        out.push_str(&segment[last..]);

        // `PathSegmentsMut` would resolve these and reroute the request.
        if out == "." || out == ".." {
            return Err(Error::malformed_input(
                format!("argument yields the dot segment '{}'", out),
                ErrorContext::new()
                    .with_field_path(segment)
                    .with_details(format!("operation: {}", self.operation_id))
                    .with_source("call_dispatcher"),
            ));
        }
        Ok(out)
    }

    fn missing(&self, argument: &str) -> Error {
        Error::MissingArgument {
            operation: self.operation_id.clone(),
            argument: argument.to_string(),
        }
    }
}

/// Strings verbatim, other scalars via display, arrays/objects as JSON.
///
/// `null` renders as an empty string. Query arrays never reach this as a
/// whole; `prepare` expands them into repeated pairs first.
pub fn arg_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
