//! API description → function declarations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::type_map::map_type;
use crate::openapi::{ApiDescription, HttpMethod, OperationSpec};
use crate::types::tool::{FunctionDeclaration, FunctionParameters, PropertySchema, Tool};
use crate::Result;

/// What happens to the sibling methods of a path after one of its operations
/// is rejected for having no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionMode {
    /// Skip the rejected operation and keep converting its siblings.
    #[default]
    SkipOperation,
    /// Stop converting the remaining methods of that path.
    LegacyTruncate,
}

impl FromStr for ExclusionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip_operation" => Ok(ExclusionMode::SkipOperation),
            "legacy" | "legacy_truncate" => Ok(ExclusionMode::LegacyTruncate),
            other => Err(format!(
                "unknown exclusion mode '{}' (expected 'skip' or 'legacy')",
                other
            )),
        }
    }
}

/// Why an operation was left out of the tool list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingOperationId,
    NoParameters,
    UndocumentedParameter { parameter: String },
    TruncatedByLegacyBreak,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingOperationId => f.write_str("no operationId"),
            SkipReason::NoParameters => f.write_str("no parameters"),
            SkipReason::UndocumentedParameter { parameter } => {
                write!(f, "parameter '{}' has no description", parameter)
            }
            SkipReason::TruncatedByLegacyBreak => {
                f.write_str("sibling without parameters ended conversion of this path")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub reason: SkipReason,
}

/// Converted tools plus every exclusion, for inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    pub tools: Vec<Tool>,
    pub skipped: Vec<SkippedOperation>,
}

impl ConversionReport {
    pub fn skip_reason(&self, operation_id: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.operation_id.as_deref() == Some(operation_id))
            .map(|s| &s.reason)
    }

    /// Names of the converted functions, in output order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter_map(|t| t.declaration())
            .map(|d| d.name.as_str())
            .collect()
    }
}

/// Builds one function declaration per eligible operation.
///
/// An operation is eligible when it has an `operationId`, at least one
/// parameter, and a description on every parameter. A single undocumented
/// parameter drops the whole operation.
#[derive(Debug, Clone, Default)]
pub struct ToolSchemaConverter {
    mode: ExclusionMode,
}

impl ToolSchemaConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclusion_mode(mut self, mode: ExclusionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn exclusion_mode(&self) -> ExclusionMode {
        self.mode
    }

    pub fn convert(&self, description: &ApiDescription) -> Vec<Tool> {
        self.convert_with_report(description).tools
    }

    pub fn convert_with_report(&self, description: &ApiDescription) -> ConversionReport {
        let mut report = ConversionReport::default();

        for (path, item) in &description.paths {
            let mut truncated = false;
            for (method, operation) in &item.operations {
                let reason = if truncated {
                    SkipReason::TruncatedByLegacyBreak
                } else {
                    match Self::convert_operation(operation) {
                        Ok(declaration) => {
                            report.tools.push(Tool::single(declaration));
                            continue;
                        }
                        Err(reason) => reason,
                    }
                };

                if reason == SkipReason::NoParameters
                    && self.mode == ExclusionMode::LegacyTruncate
                {
                    truncated = true;
                }

                debug!(
                    path = path.as_str(),
                    method = %method,
                    operation_id = operation.operation_id.as_deref().unwrap_or("-"),
                    reason = %reason,
                    "operation excluded from tool schema"
                );
                report.skipped.push(SkippedOperation {
                    path: path.clone(),
                    method: *method,
                    operation_id: operation.operation_id.clone(),
                    reason,
                });
            }
        }

        report
    }

    fn convert_operation(
        operation: &OperationSpec,
    ) -> std::result::Result<FunctionDeclaration, SkipReason> {
        let name = operation
            .operation_id
            .as_ref()
            .ok_or(SkipReason::MissingOperationId)?;

        let parameters = operation.parameters();
        if parameters.is_empty() {
            return Err(SkipReason::NoParameters);
        }

        let mut schema = FunctionParameters::object();
        for param in parameters {
            let description =
                param
                    .description
                    .as_ref()
                    .ok_or_else(|| SkipReason::UndocumentedParameter {
                        parameter: param.name.clone(),
                    })?;

            schema.properties.insert(
                param.name.clone(),
                PropertySchema {
                    schema_type: map_type(param.schema_type()),
                    description: description.clone(),
                },
            );
            if param.required && !schema.required.contains(&param.name) {
                schema.required.push(param.name.clone());
            }
        }

        Ok(FunctionDeclaration {
            name: name.clone(),
            description: operation.summary.clone().unwrap_or_default(),
            parameters: schema,
        })
    }
}

/// Serialize a tool list to the pretty-printed wire array.
pub fn tools_to_json(tools: &[Tool]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tools)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ParameterSpec;
    use crate::schema::SchemaType;

    fn search_products() -> OperationSpec {
        OperationSpec::new("searchProducts")
            .with_summary("Search for products by name")
            .with_parameter(
                ParameterSpec::query("name", "string")
                    .described("Product Name")
                    .required(),
            )
    }

    fn get_by_id() -> OperationSpec {
        OperationSpec::new("getProductById")
            .with_summary("Get a product by ID")
            .with_parameter(
                ParameterSpec::path("id", "integer")
                    .described("ID of the product to be obtained. Cannot be empty."),
            )
    }

    #[test]
    fn test_search_products_declaration() {
        let desc = ApiDescription::new().with_operation(
            "/api/products/search",
            HttpMethod::Get,
            search_products(),
        );
        let tools = ToolSchemaConverter::new().convert(&desc);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].function_declarations.len(), 1);

        let decl = tools[0].declaration().unwrap();
        assert_eq!(decl.name, "searchProducts");
        assert_eq!(decl.description, "Search for products by name");
        assert_eq!(decl.parameters.schema_type, "OBJECT");
        assert_eq!(decl.parameters.properties.len(), 1);
        assert_eq!(decl.parameters.properties["name"].schema_type, SchemaType::String);
        assert_eq!(decl.parameters.properties["name"].description, "Product Name");
        assert_eq!(decl.parameters.required, vec!["name".to_string()]);
    }

    #[test]
    fn test_missing_operation_id_is_skipped() {
        let mut op = search_products();
        op.operation_id = None;
        let desc = ApiDescription::new().with_operation("/api/products/search", HttpMethod::Get, op);
        let report = ToolSchemaConverter::new().convert_with_report(&desc);
        assert!(report.tools.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::MissingOperationId);
    }

    #[test]
    fn test_empty_and_absent_parameters_are_skipped() {
        let mut empty = OperationSpec::new("getProductCount");
        empty.parameters = Some(Vec::new());
        let desc = ApiDescription::new()
            .with_operation("/api/products", HttpMethod::Get, OperationSpec::new("getAllProducts"))
            .with_operation("/api/products/count", HttpMethod::Get, empty);
        let report = ToolSchemaConverter::new().convert_with_report(&desc);
        assert!(report.tools.is_empty());
        assert_eq!(report.skip_reason("getAllProducts"), Some(&SkipReason::NoParameters));
        assert_eq!(report.skip_reason("getProductCount"), Some(&SkipReason::NoParameters));
    }

    #[test]
    fn test_one_undocumented_parameter_drops_operation() {
        let op = search_products().with_parameter(ParameterSpec::query("limit", "integer"));
        let desc = ApiDescription::new().with_operation("/api/products/search", HttpMethod::Get, op);
        let report = ToolSchemaConverter::new().convert_with_report(&desc);
        assert!(report.tools.is_empty());
        assert_eq!(
            report.skip_reason("searchProducts"),
            Some(&SkipReason::UndocumentedParameter {
                parameter: "limit".into()
            })
        );
    }

    #[test]
    fn test_missing_summary_becomes_empty_description() {
        let mut op = search_products();
        op.summary = None;
        let desc = ApiDescription::new().with_operation("/api/products/search", HttpMethod::Get, op);
        let tools = ToolSchemaConverter::new().convert(&desc);
        assert_eq!(tools[0].declaration().unwrap().description, "");
    }

    #[test]
    fn test_optional_parameters_not_required() {
        let op = search_products().with_parameter(
            ParameterSpec::query("inStock", "boolean").described("Only products in stock"),
        );
        let desc = ApiDescription::new().with_operation("/api/products/search", HttpMethod::Get, op);
        let tools = ToolSchemaConverter::new().convert(&desc);
        let decl = tools[0].declaration().unwrap();
        assert_eq!(decl.parameters.properties["inStock"].schema_type, SchemaType::Boolean);
        assert_eq!(decl.parameters.required, vec!["name".to_string()]);
    }

    fn product_by_id_path() -> ApiDescription {
        // delete has no parameters here; get and put after it are fine.
        ApiDescription::new()
            .with_operation("/api/products/{id}", HttpMethod::Delete, OperationSpec::new("deleteProduct"))
            .with_operation("/api/products/{id}", HttpMethod::Get, get_by_id())
            .with_operation("/api/products/search", HttpMethod::Get, search_products())
    }

    #[test]
    fn test_skip_mode_keeps_siblings() {
        let report = ToolSchemaConverter::new().convert_with_report(&product_by_id_path());
        assert_eq!(report.tool_names(), vec!["getProductById", "searchProducts"]);
    }

    #[test]
    fn test_legacy_mode_truncates_path() {
        let report = ToolSchemaConverter::new()
            .with_exclusion_mode(ExclusionMode::LegacyTruncate)
            .convert_with_report(&product_by_id_path());
        // The next path is unaffected.
        assert_eq!(report.tool_names(), vec!["searchProducts"]);
        assert_eq!(
            report.skip_reason("getProductById"),
            Some(&SkipReason::TruncatedByLegacyBreak)
        );
    }

    #[test]
    fn test_exclusion_mode_parsing() {
        assert_eq!("legacy".parse::<ExclusionMode>().unwrap(), ExclusionMode::LegacyTruncate);
        assert_eq!("Skip".parse::<ExclusionMode>().unwrap(), ExclusionMode::SkipOperation);
        assert!("break".parse::<ExclusionMode>().is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_required_order() {
        let op = OperationSpec::new("updateProductPrice")
            .with_summary("Update a product's price")
            .with_parameter(ParameterSpec::path("id", "integer").described("Product id"))
            .with_parameter(
                ParameterSpec::query("price", "number")
                    .described("New price")
                    .required(),
            );
        let desc = ApiDescription::new().with_operation("/api/products/{id}/price", HttpMethod::Patch, op);
        let tools = ToolSchemaConverter::new().convert(&desc);
        let json = tools_to_json(&tools).unwrap();
        let parsed: Vec<Tool> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tools);
        assert_eq!(
            parsed[0].declaration().unwrap().parameters.required,
            vec!["id".to_string(), "price".to_string()]
        );
    }
}
