//! Model provider client: natural-language query + tool declarations in,
//! one suggested function call out.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod credential;
pub mod gemini;
mod provider;

pub use builder::{FunctionCallClientBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use self::core::FunctionCallClient;
pub use credential::Credential;
pub use provider::FunctionCallProvider;
