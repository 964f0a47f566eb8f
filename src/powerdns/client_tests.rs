use super::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONE_PATH: &str = "/api/v1/servers/localhost/zones/example.com.";

async fn setup() -> (MockServer, PowerDnsClient) {
    let server = MockServer::start().await;
    let client = PowerDnsClient::with_http(
        Client::new(),
        format!("{}/api/v1", server.uri()),
        "secret",
        "localhost",
    );
    (server, client)
}

#[tokio::test]
async fn test_get_zone_parses_rrsets() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ZONE_PATH))
        .and(query_param("rrsets", "true"))
        .and(header("X-API-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "example.com.",
            "name": "example.com.",
            "type": "Zone",
            "kind": "Native",
            "dnssec": false,
            "serial": 2024060101u64,
            "rrsets": [{
                "name": "ns1.example.com.",
                "type": "A",
                "ttl": 3600,
                "records": [{"content": "10.0.0.1", "disabled": false}],
                "comments": [{"content": "hi", "account": "", "modified_at": 1700000000}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let zone = client.get_zone("example.com.", true).await.unwrap();
    assert_eq!(zone.name, "example.com.");
    assert_eq!(zone.serial, 2024060101);
    let rrsets = zone.rrsets.unwrap();
    assert_eq!(rrsets[0].rrtype, "A");
    assert_eq!(rrsets[0].records[0].content, "10.0.0.1");
    assert_eq!(rrsets[0].comments[0].modified_at, 1700000000);
}

#[tokio::test]
async fn test_get_zone_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ZONE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_zone("example.com.", false).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_zone_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(ZONE_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_zone("example.com.", false).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
}

#[tokio::test]
async fn test_create_zone_posts_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/servers/localhost/zones"))
        .and(body_json(json!({
            "name": "example.com.",
            "kind": "Native",
            "dnssec": false,
            "nameservers": ["ns1.example.com."],
            "rrsets": [{
                "name": "ns1.example.com.",
                "type": "A",
                "ttl": 3600,
                "records": [{"content": "10.0.0.1", "disabled": false}]
            }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "example.com."})))
        .expect(1)
        .mount(&server)
        .await;

    let create = PdnsZoneCreate {
        name: "example.com.".into(),
        kind: "Native".into(),
        dnssec: false,
        nameservers: vec!["ns1.example.com.".into()],
        rrsets: vec![PdnsRrset {
            name: "ns1.example.com.".into(),
            rrtype: "A".into(),
            ttl: RRSET_TTL,
            changetype: None,
            records: vec![PdnsRecord::enabled("10.0.0.1")],
            comments: Vec::new(),
        }],
    };
    client.create_zone(&create).await.unwrap();
}

#[tokio::test]
async fn test_create_zone_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/servers/localhost/zones"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Conflict"))
        .mount(&server)
        .await;

    let create = PdnsZoneCreate {
        name: "example.com.".into(),
        kind: "Native".into(),
        dnssec: false,
        nameservers: vec![],
        rrsets: vec![],
    };
    let err = client.create_zone(&create).await.unwrap_err();
    assert!(matches!(err, Error::ZoneAlreadyExists { .. }));
}

#[tokio::test]
async fn test_patch_rrsets_wraps_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(ZONE_PATH))
        .and(body_json(json!({
            "rrsets": [{
                "name": "ns2.example.com.",
                "type": "A",
                "ttl": 3600,
                "changetype": "DELETE",
                "records": []
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let rrset = PdnsRrset {
        name: "ns2.example.com.".into(),
        rrtype: "A".into(),
        ttl: RRSET_TTL,
        changetype: Some("DELETE".into()),
        records: vec![],
        comments: vec![],
    };
    client.patch_rrsets("example.com.", &[rrset]).await.unwrap();
}

#[tokio::test]
async fn test_patch_rrsets_unexpected_status_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(ZONE_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_string("RRset ns1. IN A: conflicts"))
        .mount(&server)
        .await;

    let err = client.patch_rrsets("example.com.", &[]).await.unwrap_err();
    match err {
        Error::UnexpectedStatus { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("conflicts"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_update_zone_puts_attributes() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(ZONE_PATH))
        .and(body_json(json!({"kind": "Master", "dnssec": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let attrs = PdnsZoneUpdate {
        kind: "Master".into(),
        dnssec: true,
    };
    client.update_zone("example.com.", &attrs).await.unwrap();
}

#[tokio::test]
async fn test_delete_zone_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(ZONE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.delete_zone("example.com.").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { ref zone } if zone == "example.com."));
}

#[test]
fn test_from_config_appends_api_prefix() {
    let config = ClientConfig {
        endpoint: "https://pdns.example.com/".into(),
        api_key: "secret".into(),
        server_id: "localhost".into(),
        skip_tls_verify: false,
    };
    let client = PowerDnsClient::from_config(&config).unwrap();
    assert_eq!(
        client.url("zones"),
        "https://pdns.example.com/api/v1/servers/localhost/zones"
    );
}
