use async_trait::async_trait;

use crate::types::tool::{FunctionCallOutcome, Tool};
use crate::Result;

/// Anything that can turn a query plus tool declarations into a function call
/// suggestion.
///
/// [`FunctionCallClient`](super::FunctionCallClient) is the network-backed
/// implementation; the [`Bridge`](crate::bridge::Bridge) only sees this trait.
#[async_trait]
pub trait FunctionCallProvider: Send + Sync + std::fmt::Debug {
    async fn suggest(&self, query: &str, tools: &[Tool]) -> Result<FunctionCallOutcome>;
}
