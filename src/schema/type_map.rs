use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type names accepted in function declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "STRING",
            SchemaType::Number => "NUMBER",
            SchemaType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an API parameter type name onto the model's type set.
///
/// Unknown or missing types degrade to `STRING`.
pub fn map_type(source_type: &str) -> SchemaType {
    match source_type {
        "string" => SchemaType::String,
        "number" | "integer" => SchemaType::Number,
        "boolean" => SchemaType::Boolean,
        _ => SchemaType::String,
    }
}
