//! # api-fncall-bridge
//!
//! Let a function-calling LLM drive an existing HTTP API through natural
//! language.
//!
//! ## Overview
//!
//! The service's machine-readable description (OpenAPI-style `paths`) is
//! converted into Gemini `functionDeclarations`. A user query is sent to the
//! model together with those declarations; the function call it suggests is
//! mapped back to the real operation, executed, and the raw response body is
//! returned.
//!
//! ```text
//! ApiDescription ─▶ ToolSchemaConverter ─▶ [Tool] ─▶ FunctionCallClient ─▶ FunctionCall ─▶ CallDispatcher ─▶ body
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use api_fncall_bridge::{Bridge, BridgeConfig, BridgeOutcome};
//!
//! #[tokio::main]
//! async fn main() -> api_fncall_bridge::Result<()> {
//!     let config = BridgeConfig::from_env()?;
//!     let bridge = Bridge::from_config(&config, None).await?;
//!
//!     match bridge.run("Find the product named 'Smartphone'").await? {
//!         BridgeOutcome::Executed { call, body } => println!("{} -> {}", call.name, body),
//!         BridgeOutcome::NoCall { text } => println!("no call: {:?}", text),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`openapi`] | API description model and loaders |
//! | [`schema`] | Type mapping and tool schema conversion |
//! | [`types`] | Tool declaration and function call wire types |
//! | [`client`] | Model provider client |
//! | [`dispatch`] | Function call → HTTP operation |
//! | [`bridge`] | End-to-end orchestration |
//! | [`config`] | Configuration from YAML and environment |
//! | [`transport`] | Shared HTTP transport |

pub mod bridge;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod openapi;
pub mod schema;
pub mod transport;
pub mod types;

pub use bridge::{Bridge, BridgeOutcome};
pub use client::{FunctionCallClient, FunctionCallClientBuilder, FunctionCallProvider};
pub use config::BridgeConfig;
pub use dispatch::CallDispatcher;
pub use openapi::ApiDescription;
pub use schema::{map_type, tools_to_json, ConversionReport, ExclusionMode, ToolSchemaConverter};
pub use types::{FunctionCall, FunctionCallOutcome, Tool};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
