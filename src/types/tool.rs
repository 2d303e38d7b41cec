//! Function-calling wire types for Gemini-style `generateContent` requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::schema::SchemaType;

/// One element of the request's `tools` array.
///
/// The converter always emits exactly one declaration per wrapper; a list of
/// single-function wrappers is the shape the provider receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

impl Tool {
    pub fn single(declaration: FunctionDeclaration) -> Self {
        Self {
            function_declarations: vec![declaration],
        }
    }

    /// The wrapped declaration.
    pub fn declaration(&self) -> Option<&FunctionDeclaration> {
        self.function_declarations.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: FunctionParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub schema_type: String, // "OBJECT"
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl FunctionParameters {
    pub fn object() -> Self {
        Self {
            schema_type: "OBJECT".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub description: String,
}

/// Function call suggested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Argument by name; JSON `null` counts as absent.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }
}

/// What the model answered to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCallOutcome {
    /// The model picked a function.
    Call(FunctionCall),
    /// The model answered without calling anything.
    NoCall {
        text: Option<String>,
        finish_reason: Option<String>,
    },
}

impl FunctionCallOutcome {
    pub fn into_call(self) -> Option<FunctionCall> {
        match self {
            FunctionCallOutcome::Call(call) => Some(call),
            FunctionCallOutcome::NoCall { .. } => None,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, FunctionCallOutcome::Call(_))
    }
}
