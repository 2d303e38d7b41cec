//! Tool schema conversion against the product service description.

mod common;

use api_fncall_bridge::schema::{SchemaType, SkipReason};
use api_fncall_bridge::{tools_to_json, ExclusionMode, ToolSchemaConverter};

#[test]
fn test_products_description_declares_documented_operations() {
    let desc = common::products_description();
    let report = ToolSchemaConverter::new().convert_with_report(&desc);

    assert_eq!(report.tool_names(), vec!["getProductById", "searchProducts"]);

    let search = report.tools[1].declaration().unwrap();
    assert_eq!(search.description, "Search for products by name");
    assert_eq!(search.parameters.schema_type, "OBJECT");
    assert_eq!(search.parameters.required, vec!["name".to_string()]);
    let name = &search.parameters.properties["name"];
    assert_eq!(name.schema_type, SchemaType::String);
    assert_eq!(name.description, "Product Name");

    let by_id = report.tools[0].declaration().unwrap();
    assert_eq!(by_id.parameters.properties["id"].schema_type, SchemaType::Number);
}

#[test]
fn test_products_description_skip_reasons() {
    let desc = common::products_description();
    let report = ToolSchemaConverter::new().convert_with_report(&desc);

    assert_eq!(
        report.skip_reason("updateProduct"),
        Some(&SkipReason::UndocumentedParameter {
            parameter: "id".into()
        })
    );
    assert_eq!(report.skip_reason("getAllProducts"), Some(&SkipReason::NoParameters));
    assert_eq!(report.skip_reason("createProduct"), Some(&SkipReason::NoParameters));
    assert_eq!(report.skip_reason("healthCheck"), Some(&SkipReason::NoParameters));
    assert_eq!(report.tools.len() + report.skipped.len(), desc.operations().count());
}

#[test]
fn test_legacy_mode_truncates_rest_of_path() {
    let desc = common::products_description();
    let report = ToolSchemaConverter::new()
        .with_exclusion_mode(ExclusionMode::LegacyTruncate)
        .convert_with_report(&desc);

    assert_eq!(report.tool_names(), vec!["getProductById", "searchProducts"]);
    assert_eq!(
        report.skip_reason("createProduct"),
        Some(&SkipReason::TruncatedByLegacyBreak)
    );
}

#[test]
fn test_serialized_schema_wire_shape() {
    let desc = common::products_description();
    let tools = ToolSchemaConverter::new().convert(&desc);
    let json: serde_json::Value = serde_json::from_str(&tools_to_json(&tools).unwrap()).unwrap();

    let decl = &json[1]["functionDeclarations"][0];
    assert_eq!(decl["name"], "searchProducts");
    assert_eq!(decl["parameters"]["type"], "OBJECT");
    assert_eq!(decl["parameters"]["properties"]["name"]["type"], "STRING");
    assert_eq!(decl["parameters"]["required"][0], "name");
}
