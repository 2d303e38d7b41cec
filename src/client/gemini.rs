//! Gemini generateContent 请求/响应格式
//!
//! Request and response shapes for `models/{model}:generateContent`:
//! - Request: `{ contents: [{ parts: [{ text }] }], tools: [...] }`.
//! - Response: `candidates[0].content.parts[0]` holds either `functionCall`
//!   (`{ name, args }`) or plain `text`.
//! - API key is passed as `?key=` query parameter, not in headers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::tool::{FunctionCall, FunctionCallOutcome};
use crate::{Error, ErrorContext, Result};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
    pub tools: &'a Value,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// Single-turn request: one user message, the full tool set.
    pub fn single_turn(query: &'a str, tools: &'a Value) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: query }],
            }],
            tools,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<RawFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct RawFunctionCall {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    args: Option<Map<String, Value>>,
}

fn malformed(message: impl Into<String>, field_path: &str) -> Error {
    Error::malformed_response(
        message,
        ErrorContext::new()
            .with_field_path(field_path)
            .with_source("function_call_client"),
    )
}

/// Extract the function call from `candidates[0].content.parts[0]`.
///
/// A well-formed candidate whose first part carries no `functionCall` is a
/// legitimate [`FunctionCallOutcome::NoCall`], not an error.
pub fn parse_response(body: &str) -> Result<FunctionCallOutcome> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| malformed(format!("response is not valid JSON: {}", e), "$"))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| malformed("response has no candidates", "candidates"))?;
    let finish_reason = candidate.finish_reason;

    let part = candidate
        .content
        .and_then(|c| c.parts)
        .and_then(|parts| parts.into_iter().next())
        .ok_or_else(|| malformed("candidate has no content parts", "candidates[0].content.parts"))?;

    match part.function_call {
        Some(raw) => {
            let name = raw.name.filter(|n| !n.is_empty()).ok_or_else(|| {
                malformed(
                    "function call has no name",
                    "candidates[0].content.parts[0].functionCall.name",
                )
            })?;
            Ok(FunctionCallOutcome::Call(FunctionCall {
                name,
                args: raw.args.unwrap_or_default(),
            }))
        }
        None => Ok(FunctionCallOutcome::NoCall {
            text: part.text,
            finish_reason,
        }),
    }
}
