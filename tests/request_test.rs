//! Tests for [`DefaultRequestHandler`]: wire paths, request headers,
//! envelope extraction, error decoding, and timeout retry.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipregistry::request::RequestHandler;
use ipregistry::{
    DefaultCache, DefaultRequestHandler, IpregistryClient, IpregistryConfig, IpregistryError,
    LookupOption, RetryPolicy,
};

fn handler_for(server: &MockServer) -> DefaultRequestHandler {
    let config = IpregistryConfig::builder("test-key")
        .base_url(server.uri())
        .build();
    DefaultRequestHandler::new(config)
}

#[tokio::test]
async fn lookup_ip_decodes_payload_and_accounting_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "ip": "8.8.4.4",
                    "type": "IPv4",
                    "location": {"city": "Mountain View"}
                }))
                .insert_header("ipregistry-credits-consumed", "1")
                .insert_header("ipregistry-credits-remaining", "41")
                .insert_header("x-rate-limit-limit", "1000")
                .insert_header("x-rate-limit-remaining", "998")
                .insert_header("x-rate-limit-reset", "3600"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = handler_for(&server).lookup_ip("8.8.4.4", &[]).await.unwrap();

    assert_eq!(response.data.ip, "8.8.4.4");
    assert_eq!(
        response.data.location.unwrap().city.as_deref(),
        Some("Mountain View")
    );
    assert_eq!(response.credits.consumed, Some(1));
    assert_eq!(response.credits.remaining, Some(41));

    let throttling = response.throttling.unwrap();
    assert_eq!(throttling.limit, 1000);
    assert_eq!(throttling.remaining, 998);
    assert_eq!(throttling.reset, 3600);
}

#[tokio::test]
async fn absent_accounting_headers_stay_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "8.8.4.4"})))
        .mount(&server)
        .await;

    let response = handler_for(&server).lookup_ip("8.8.4.4", &[]).await.unwrap();

    assert_eq!(response.credits.consumed, None);
    assert_eq!(response.credits.remaining, None);
    assert!(response.throttling.is_none());
}

#[tokio::test]
async fn partial_throttling_headers_default_to_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ip": "8.8.4.4"}))
                .insert_header("x-rate-limit-limit", "1000"),
        )
        .mount(&server)
        .await;

    let response = handler_for(&server).lookup_ip("8.8.4.4", &[]).await.unwrap();

    let throttling = response.throttling.unwrap();
    assert_eq!(throttling.limit, 1000);
    assert_eq!(throttling.remaining, 0);
    assert_eq!(throttling.reset, 0);
}

#[tokio::test]
async fn requests_carry_credential_and_client_identification() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .and(header("authorization", "ApiKey test-key"))
        .and(header(
            "user-agent",
            concat!("Ipregistry/Rust/", env!("CARGO_PKG_VERSION")),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "8.8.4.4"})))
        .expect(1)
        .mount(&server)
        .await;

    handler_for(&server).lookup_ip("8.8.4.4", &[]).await.unwrap();
}

#[tokio::test]
async fn options_become_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .and(query_param("hostname", "true"))
        .and(query_param("fields", "location.country"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "8.8.4.4"})))
        .expect(1)
        .mount(&server)
        .await;

    let options = [
        LookupOption::hostname(true),
        LookupOption::filter("location.country"),
    ];
    handler_for(&server)
        .lookup_ip("8.8.4.4", &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn asn_lookup_uses_prefixed_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/AS13335"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"asn": 13335, "name": "CLOUDFLARENET"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = handler_for(&server).lookup_asn(13335, &[]).await.unwrap();
    assert_eq!(response.data.asn, 13335);
    assert_eq!(response.data.name.as_deref(), Some("CLOUDFLARENET"));
}

#[tokio::test]
async fn batch_ips_posts_addresses_and_decodes_mixed_slots() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(json!(["66.165.2.7", "not-an-ip"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"ip": "66.165.2.7", "type": "IPv4"},
                {
                    "code": "INVALID_IP_ADDRESS",
                    "message": "the value is not a valid IP",
                    "resolution": "submit a well-formed address"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = handler_for(&server)
        .batch_lookup_ips(&["66.165.2.7", "not-an-ip"], &[])
        .await
        .unwrap();

    let results = &response.data.results;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].success().unwrap().ip, "66.165.2.7");
    assert_eq!(
        results[1].lookup_error().unwrap().code,
        "INVALID_IP_ADDRESS"
    );
}

#[tokio::test]
async fn batch_asns_renders_numbers_with_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(json!(["AS13335", "AS15169"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"asn": 13335}, {"asn": 15169}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = handler_for(&server)
        .batch_lookup_asns(&[13335, 15169], &[])
        .await
        .unwrap();
    assert_eq!(response.data.results.len(), 2);
}

#[tokio::test]
async fn origin_lookups_target_root_and_as_paths() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "203.0.113.7",
            "user_agent": {"name": "Firefox"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/AS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"asn": 64496})))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server);

    let origin_ip = handler.origin_lookup_ip(&[]).await.unwrap();
    assert_eq!(origin_ip.data.info.ip, "203.0.113.7");
    assert_eq!(
        origin_ip.data.user_agent.unwrap().name.as_deref(),
        Some("Firefox")
    );

    let origin_asn = handler.origin_lookup_asn(&[]).await.unwrap();
    assert_eq!(origin_asn.data.asn, 64496);
}

#[tokio::test]
async fn user_agent_parsing_posts_to_dedicated_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user_agent"))
        .and(body_json(json!(["Mozilla/5.0"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"header": "Mozilla/5.0", "name": "Firefox"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = handler_for(&server)
        .parse_user_agents(&["Mozilla/5.0"])
        .await
        .unwrap();
    assert_eq!(
        response.data.results[0].name.as_deref(),
        Some("Firefox")
    );
}

#[tokio::test]
async fn rejection_decodes_into_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "DISABLED_API_KEY",
            "message": "the API key is disabled",
            "resolution": "re-enable the key in the dashboard"
        })))
        .mount(&server)
        .await;

    let error = handler_for(&server)
        .lookup_ip("8.8.4.4", &[])
        .await
        .unwrap_err();

    match error {
        IpregistryError::Api {
            code, resolution, ..
        } => {
            assert_eq!(code, "DISABLED_API_KEY");
            assert!(resolution.contains("re-enable"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_rejection_is_a_client_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let error = handler_for(&server)
        .lookup_ip("8.8.4.4", &[])
        .await
        .unwrap_err();
    assert!(matches!(error, IpregistryError::Client(_)));
}

#[tokio::test]
async fn timeouts_are_retried_then_reported_as_client_error() {
    let server = MockServer::start().await;

    // Initial attempt plus two retries, each exceeding the 100ms timeout.
    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ip": "8.8.4.4"}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let config = IpregistryConfig::builder("test-key")
        .base_url(server.uri())
        .timeout(Duration::from_millis(100))
        .build();
    let handler = DefaultRequestHandler::new(config).retry_policy(
        RetryPolicy::new()
            .max_retries(2)
            .base_delay(Duration::from_millis(1)),
    );

    let error = handler.lookup_ip("8.8.4.4", &[]).await.unwrap_err();
    match error {
        IpregistryError::Client(message) => assert!(message.contains("timed out")),
        other => panic!("expected Client error, got {other:?}"),
    }
}

#[tokio::test]
async fn disabled_retry_fails_on_first_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ip": "8.8.4.4"}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = IpregistryConfig::builder("test-key")
        .base_url(server.uri())
        .timeout(Duration::from_millis(100))
        .build();
    let handler = DefaultRequestHandler::new(config).retry_policy(RetryPolicy::disabled());

    let error = handler.lookup_ip("8.8.4.4", &[]).await.unwrap_err();
    assert!(matches!(error, IpregistryError::Client(_)));
}

#[tokio::test]
async fn client_over_http_serves_second_lookup_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.4.4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ip": "8.8.4.4"}))
                .insert_header("ipregistry-credits-consumed", "1")
                .insert_header("ipregistry-credits-remaining", "41"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = IpregistryConfig::builder("test-key")
        .base_url(server.uri())
        .build();
    let client =
        IpregistryClient::with_config(config).cache_store(DefaultCache::default());

    let first = client.lookup_ip("8.8.4.4", &[]).await.unwrap();
    assert_eq!(first.credits.consumed, Some(1));

    let second = client.lookup_ip("8.8.4.4", &[]).await.unwrap();
    assert_eq!(second.credits.consumed, Some(0));
    assert_eq!(second.credits.remaining, None);
}
