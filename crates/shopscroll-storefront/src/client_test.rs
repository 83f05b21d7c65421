use super::*;

#[test]
fn graphql_endpoint_from_bare_domain() {
    assert_eq!(
        graphql_endpoint("demo.myshopify.com", "2024-10").unwrap(),
        "https://demo.myshopify.com/api/2024-10/graphql.json"
    );
}

#[test]
fn graphql_endpoint_strips_scheme_path_and_trailing_slash() {
    assert_eq!(
        graphql_endpoint("https://shop.example.com/collections/all/", "2024-10").unwrap(),
        "https://shop.example.com/api/2024-10/graphql.json"
    );
}

#[test]
fn graphql_endpoint_rejects_empty_domain() {
    let err = graphql_endpoint("  ", "2024-10").unwrap_err();
    assert!(
        matches!(err, StorefrontError::InvalidStoreDomain { .. }),
        "expected InvalidStoreDomain, got: {err:?}"
    );
}

#[test]
fn graphql_endpoint_rejects_unparseable_domain() {
    assert!(graphql_endpoint("exa mple.com", "2024-10").is_err());
}

#[test]
fn extract_domain_returns_host() {
    assert_eq!(
        extract_domain("https://demo.myshopify.com/api/2024-10/graphql.json"),
        "demo.myshopify.com"
    );
    assert_eq!(extract_domain("not a url"), "not a url");
}

#[test]
fn envelope_with_errors_is_graphql_error() {
    let envelope: GraphQlEnvelope = serde_json::from_value(json!({
        "data": null,
        "errors": [{"message": "Field 'nope' doesn't exist on type 'QueryRoot'"}]
    }))
    .unwrap();
    let err = unwrap_envelope(envelope).unwrap_err();
    match err {
        StorefrontError::GraphQl { messages } => assert_eq!(messages.len(), 1),
        other => panic!("expected GraphQl, got {other:?}"),
    }
}

#[test]
fn envelope_without_data_is_malformed() {
    let envelope: GraphQlEnvelope = serde_json::from_value(json!({})).unwrap();
    assert!(matches!(
        unwrap_envelope(envelope),
        Err(StorefrontError::MalformedResponse { .. })
    ));
}

#[test]
fn envelope_data_is_returned() {
    let envelope: GraphQlEnvelope =
        serde_json::from_value(json!({"data": {"products": {"nodes": []}}})).unwrap();
    assert_eq!(
        unwrap_envelope(envelope).unwrap(),
        json!({"products": {"nodes": []}})
    );
}

#[test]
fn paging_error_from_storefront_error() {
    let rate_limited: PagingError = StorefrontError::RateLimited {
        domain: "demo.myshopify.com".to_owned(),
        retry_after_secs: 2,
    }
    .into();
    assert!(matches!(
        rate_limited,
        PagingError::Fetch {
            retriable: true,
            ..
        }
    ));

    let graphql: PagingError = StorefrontError::GraphQl {
        messages: vec!["boom".to_owned()],
    }
    .into();
    assert!(matches!(
        graphql,
        PagingError::Fetch {
            retriable: false,
            ..
        }
    ));
    assert!(!graphql.is_terminal());

    let malformed: PagingError = StorefrontError::MalformedResponse {
        reason: "no data".to_owned(),
    }
    .into();
    assert!(malformed.is_terminal());

    let inner = PagingError::malformed("/products", "missing");
    let passthrough: PagingError = StorefrontError::Paging(inner.clone()).into();
    assert_eq!(passthrough, inner);
}

#[test]
fn debug_output_redacts_access_token() {
    let client = StorefrontClient::with_endpoint(
        "http://127.0.0.1:1/graphql.json",
        "shpat_secret",
        5,
        "shopscroll-test/0.1",
        0,
        0,
    )
    .unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("shpat_secret"));
    assert!(debug.contains("[redacted]"));
}
