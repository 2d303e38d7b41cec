//! Mock HTTP server setup shared by the integration tests

#![allow(dead_code)]

use api_fncall_bridge::{ApiDescription, FunctionCallClient};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_MODEL: &str = "gemini-1.5-flash";

/// The product service description served at `/v3/api-docs`.
pub const PRODUCTS_DESCRIPTION: &str = include_str!("../fixtures/products_openapi.json");

pub fn products_description() -> ApiDescription {
    ApiDescription::from_json_str(PRODUCTS_DESCRIPTION).expect("fixture parses")
}

/// Gemini body whose first part is a function call.
pub fn function_call_body(name: &str, args: serde_json::Value) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "functionCall": { "name": name, "args": args } }]
            },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Gemini body with a plain text answer.
pub fn text_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Test fixture that owns a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Provider base URL as the client expects it (`.../v1`).
    pub fn provider_base_url(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn generate_content_path(model: &str) -> String {
        format!("/v1/models/{}:generateContent", model)
    }

    /// Create a client pointed at the mock server
    pub fn create_test_client(&self) -> api_fncall_bridge::Result<FunctionCallClient> {
        FunctionCallClient::builder()
            .api_key(TEST_API_KEY)
            .base_url(self.provider_base_url())
            .model(TEST_MODEL)
            .build()
    }

    /// Mock the content-generation endpoint; the key must arrive as `?key=`.
    pub async fn mock_generate_content(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", Self::generate_content_path(TEST_MODEL).as_str())
            .match_query(Matcher::UrlEncoded("key".into(), TEST_API_KEY.into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Serve the product description at `/v3/api-docs`.
    pub async fn mock_api_docs(&mut self) -> Mock {
        self.server
            .mock("GET", "/v3/api-docs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PRODUCTS_DESCRIPTION)
            .create_async()
            .await
    }
}
