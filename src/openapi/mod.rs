//! API description model: the machine-readable list of operations exposed by
//! the target service, shaped like an OpenAPI `paths` object.
//!
//! Only the parts the bridge reads are modeled. Unknown keys are ignored so a
//! full OpenAPI document (with `info`, `components`, ...) deserializes as-is.

pub mod error;
pub mod loader;

pub use error::DescriptionError;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered `path -> method -> operation` mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    pub paths: IndexMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ServerSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an operation. Paths and methods keep insertion order.
    pub fn with_operation(
        mut self,
        path: impl Into<String>,
        method: HttpMethod,
        operation: OperationSpec,
    ) -> Self {
        self.paths
            .entry(path.into())
            .or_default()
            .operations
            .insert(method, operation);
        self
    }

    /// Iterate every operation in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &OperationSpec)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path.as_str(), *method, op))
        })
    }

    /// First `servers[].url`, if the document declares one.
    pub fn default_server_url(&self) -> Option<&str> {
        self.servers.first().map(|s| s.url.as_str())
    }
}

/// Operations available on one path.
///
/// Non-method keys of an OpenAPI path item (`parameters`, `summary`,
/// `servers`, `$ref`, ...) are dropped while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PathItem {
    pub operations: IndexMap<HttpMethod, OperationSpec>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut operations = IndexMap::new();
        for (key, value) in raw {
            let Ok(method) = key.parse::<HttpMethod>() else {
                continue;
            };
            let operation = serde_json::from_value::<OperationSpec>(value)
                .map_err(|e| D::Error::custom(format!("operation '{}': {}", key, e)))?;
            operations.insert(method, operation);
        }
        Ok(PathItem { operations })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "put" => Ok(HttpMethod::Put),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            "trace" => Ok(HttpMethod::Trace),
            other => Err(format!("unknown HTTP method '{}'", other)),
        }
    }
}

/// One operation. `parameters: None` (key absent) and `Some(vec![])` are kept
/// apart so callers can tell them apart, though the converter treats both
/// the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodySpec>,
}

impl OperationSpec {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: Some(operation_id.into()),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    pub fn with_request_body(mut self, required: bool) -> Self {
        self.request_body = Some(RequestBodySpec {
            description: None,
            required,
        });
        self
    }

    /// Declared parameters, empty when the key was absent.
    pub fn parameters(&self) -> &[ParameterSpec] {
        self.parameters.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    #[default]
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaSpec>,
}

impl ParameterSpec {
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        schema_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: false,
            schema: Some(SchemaSpec {
                schema_type: Some(schema_type.into()),
            }),
        }
    }

    pub fn query(name: impl Into<String>, schema_type: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Query, schema_type)
    }

    /// Path parameters are always required in OpenAPI.
    pub fn path(name: impl Into<String>, schema_type: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Path, schema_type).required()
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Source type name (`string`, `integer`, ...); empty when undeclared.
    pub fn schema_type(&self) -> &str {
        self.schema
            .as_ref()
            .and_then(|s| s.schema_type.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBodySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub required: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_item_ignores_non_method_keys() {
        let json = r#"{
            "paths": {
                "/api/products/{id}": {
                    "summary": "shared",
                    "parameters": [],
                    "get": { "operationId": "getProductById" },
                    "delete": { "operationId": "deleteProduct" }
                }
            }
        }"#;
        let desc: ApiDescription = serde_json::from_str(json).unwrap();
        let item = &desc.paths["/api/products/{id}"];
        let methods: Vec<_> = item.operations.keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Delete]);
    }

    #[test]
    fn test_parameter_defaults() {
        let json = r#"{ "name": "name", "schema": { "type": "string" } }"#;
        let param: ParameterSpec = serde_json::from_str(json).unwrap();
        assert_eq!(param.location, ParameterLocation::Query);
        assert!(!param.required);
        assert!(param.description.is_none());
        assert_eq!(param.schema_type(), "string");

        let untyped: ParameterSpec = serde_json::from_str(r#"{ "name": "x", "required": null }"#).unwrap();
        assert_eq!(untyped.schema_type(), "");
        assert!(!untyped.required);
    }

    #[test]
    fn test_absent_and_empty_parameters_are_distinct() {
        let absent: OperationSpec = serde_json::from_str(r#"{ "operationId": "a" }"#).unwrap();
        let empty: OperationSpec =
            serde_json::from_str(r#"{ "operationId": "b", "parameters": [] }"#).unwrap();
        assert!(absent.parameters.is_none());
        assert_eq!(empty.parameters, Some(vec![]));
        assert!(absent.parameters().is_empty());
    }

    #[test]
    fn test_operations_iterate_in_document_order() {
        let desc = ApiDescription::new()
            .with_operation("/b", HttpMethod::Post, OperationSpec::new("second"))
            .with_operation("/a", HttpMethod::Get, OperationSpec::new("third"))
            .with_operation("/b", HttpMethod::Get, OperationSpec::new("first"));
        let ids: Vec<_> = desc
            .operations()
            .filter_map(|(_, _, op)| op.operation_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("parameters".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
