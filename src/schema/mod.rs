//! Tool schema generation: API description → function declarations.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`map_type`] | API type name → declaration type name |
//! | [`ToolSchemaConverter`] | Walks an [`ApiDescription`](crate::openapi::ApiDescription) and emits [`Tool`](crate::types::Tool)s |
//! | [`ConversionReport`] | Converted tools plus the reason each excluded operation was skipped |

pub mod converter;
pub mod type_map;

pub use converter::{
    tools_to_json, ConversionReport, ExclusionMode, SkipReason, SkippedOperation,
    ToolSchemaConverter,
};
pub use type_map::{map_type, SchemaType};
