//! Query → model → dispatched call, with both services mocked.

mod common;

use common::{MockServerFixture, TEST_API_KEY};
use mockito::Matcher;
use serde_json::json;

use api_fncall_bridge::{Bridge, BridgeConfig, BridgeOutcome, Error};

fn config_for(fixture: &MockServerFixture) -> BridgeConfig {
    BridgeConfig {
        api_base_url: fixture.base_url.clone(),
        provider_base_url: fixture.provider_base_url(),
        timeout_secs: 5,
        ..BridgeConfig::default()
    }
}

#[tokio::test]
async fn test_query_is_answered_by_the_api() {
    let mut fixture = MockServerFixture::new().await;
    let docs = fixture.mock_api_docs().await;
    let model = fixture
        .mock_generate_content(
            200,
            &common::function_call_body("searchProducts", json!({ "name": "Smartphone" })),
        )
        .await;
    let products = r#"[{"id":2,"name":"Smartphone","price":800.0}]"#;
    let api = fixture
        .server
        .mock("GET", "/api/products/search")
        .match_query(Matcher::UrlEncoded("name".into(), "Smartphone".into()))
        .with_status(200)
        .with_body(products)
        .create_async()
        .await;

    let bridge = Bridge::from_config(&config_for(&fixture), Some(TEST_API_KEY.into()))
        .await
        .unwrap();
    assert_eq!(bridge.report().tool_names(), vec!["getProductById", "searchProducts"]);

    let outcome = bridge
        .run("Find the product named 'Smartphone'")
        .await
        .unwrap();

    docs.assert_async().await;
    model.assert_async().await;
    api.assert_async().await;
    match outcome {
        BridgeOutcome::Executed { call, body } => {
            assert_eq!(call.name, "searchProducts");
            assert_eq!(body, products);
        }
        other => panic!("expected an executed call, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_call_dispatches_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let _docs = fixture.mock_api_docs().await;
    let _model = fixture
        .mock_generate_content(200, &common::text_body("Could you name the product?"))
        .await;
    let api = fixture
        .server
        .mock("GET", Matcher::Regex("^/api/".into()))
        .expect(0)
        .create_async()
        .await;

    let bridge = Bridge::from_config(&config_for(&fixture), Some(TEST_API_KEY.into()))
        .await
        .unwrap();
    let outcome = bridge.run("hello").await.unwrap();

    api.assert_async().await;
    assert_eq!(
        outcome,
        BridgeOutcome::NoCall {
            text: Some("Could you name the product?".into())
        }
    );
}

#[tokio::test]
async fn test_bad_credential_fails_before_fetching_description() {
    let mut fixture = MockServerFixture::new().await;
    let docs = fixture
        .server
        .mock("GET", "/v3/api-docs")
        .expect(0)
        .create_async()
        .await;

    let err = Bridge::from_config(&config_for(&fixture), Some("YOUR_API_KEY".into()))
        .await
        .unwrap_err();

    docs.assert_async().await;
    assert!(matches!(err, Error::InvalidCredential { .. }));
}

#[tokio::test]
async fn test_unreachable_description_is_reported() {
    let mut fixture = MockServerFixture::new().await;
    let _docs = fixture
        .server
        .mock("GET", "/v3/api-docs")
        .with_status(503)
        .create_async()
        .await;

    let err = Bridge::from_config(&config_for(&fixture), Some(TEST_API_KEY.into()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Description(_)));
}
