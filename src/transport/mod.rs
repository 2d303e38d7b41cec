//! HTTP transport shared by the model client and the call dispatcher.

pub mod http;

pub use http::{HttpTransport, RawResponse, TransportError, TransportOptions};
