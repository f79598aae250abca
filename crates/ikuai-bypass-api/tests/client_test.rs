#![allow(clippy::unwrap_used)]
// Integration tests for `IkuaiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ikuai_bypass_api::{
    CustomIspEntry, Error, IkuaiClient, IpGroupEntry, StreamDomainEntry, StreamIpPortEntry,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, IkuaiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = IkuaiClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn ok_call() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "Result": 30000, "ErrMsg": "Success" }))
}

fn show_rows(rows: serde_json::Value) -> ResponseTemplate {
    let total = rows.as_array().map_or(0, Vec::len);
    ResponseTemplate::new(200).set_body_json(json!({
        "Result": 30000,
        "ErrMsg": "Success",
        "Data": { "total": total, "data": rows }
    }))
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/login"))
        .and(body_partial_json(json!({
            "username": "admin",
            "passwd": "21232f297a57a5a743894a0e4a801fc3",
            "pass": "c2FsdF8xMWFkbWlu",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sess_key=abc123; path=/")
                .set_body_json(json!({ "Result": 10000, "ErrMsg": "Success" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "admin".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_rejected_result_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Result": 10001, "ErrMsg": "Password error" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "Password error"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_http_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "admin".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Add tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_custom_isp_sends_tagged_row() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "custom_isp",
            "action": "add",
            "param": { "name": "CN", "ipgroup": "1.0.1.0/24,1.0.2.0/23", "comment": "IKUAI_BYPASS" }
        })))
        .respond_with(ok_call())
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_custom_isp(&CustomIspEntry::new("CN", "1.0.1.0/24,1.0.2.0/23"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_add_ip_group_sends_group_name_and_pool() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "ipgroup",
            "action": "add",
            "param": { "group_name": "cn_0", "addr_pool": "10.0.0.0/8", "type": 0 }
        })))
        .respond_with(ok_call())
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_ip_group(&IpGroupEntry::new("cn_0", "10.0.0.0/8"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_add_stream_rules_send_schedule_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "stream_domain",
            "param": { "interface": "wan2", "domain": "a.com,b.com", "week": "1234567", "enabled": "yes" }
        })))
        .respond_with(ok_call())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "stream_ipport",
            "param": { "type": "0", "interface": "wan1", "dst_addr": "cn_0,cn_1", "protocol": "tcp+udp" }
        })))
        .respond_with(ok_call())
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_stream_domain(&StreamDomainEntry::new("wan2", "", "a.com,b.com"))
        .await
        .unwrap();
    client
        .add_stream_ipport(&StreamIpPortEntry::new("0", "wan1", "", "", "cn_0,cn_1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_add_reports_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Result": 30001, "ErrMsg": "name exists" })),
        )
        .mount(&server)
        .await;

    let result = client.add_custom_isp(&CustomIspEntry::new("CN", "")).await;

    match result {
        Err(Error::Api { code, message }) => {
            assert_eq!(code, 30001);
            assert_eq!(message, "name exists");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Delete tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_by_comment_removes_tagged_rows_only() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "custom_isp",
            "action": "show",
            "param": { "FINDS": "comment", "KEYWORDS": "IKUAI_BYPASS" }
        })))
        .respond_with(show_rows(json!([
            { "id": 3, "comment": "IKUAI_BYPASS" },
            { "id": 4, "comment": "IKUAI_BYPASS" },
            { "id": 9, "comment": "IKUAI_BYPASS_manual" },
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({ "func_name": "custom_isp", "action": "show" })))
        .respond_with(show_rows(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "custom_isp",
            "action": "del",
            "param": { "id": "3,4" }
        })))
        .respond_with(ok_call())
        .expect(1)
        .mount(&server)
        .await;

    let removed = client.delete_bypass_custom_isps().await.unwrap();
    assert_eq!(removed, 2);
}

#[tokio::test]
async fn test_delete_pages_past_lookalike_comments() {
    let (server, client) = setup().await;

    // A full first page where every comment only contains the tag.
    let lookalikes: Vec<serde_json::Value> = (0..1000)
        .map(|id| json!({ "id": id, "comment": "IKUAI_BYPASS_manual" }))
        .collect();

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "ipgroup",
            "action": "show",
            "param": { "limit": "0,1000" }
        })))
        .respond_with(show_rows(serde_json::Value::Array(lookalikes)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "ipgroup",
            "action": "show",
            "param": { "limit": "1000,1000" }
        })))
        .respond_with(show_rows(json!([{ "id": 5001, "comment": "IKUAI_BYPASS" }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "ipgroup",
            "action": "show",
            "param": { "limit": "1000,1000" }
        })))
        .respond_with(show_rows(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "ipgroup",
            "action": "del",
            "param": { "id": "5001" }
        })))
        .respond_with(ok_call())
        .expect(1)
        .mount(&server)
        .await;

    let removed = client.delete_bypass_ip_groups().await.unwrap();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn test_delete_stalls_when_rows_survive() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({ "func_name": "stream_domain", "action": "show" })))
        .respond_with(show_rows(json!([{ "id": 1, "comment": "IKUAI_BYPASS" }])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({ "func_name": "stream_domain", "action": "del" })))
        .respond_with(ok_call())
        .mount(&server)
        .await;

    let result = client.delete_bypass_stream_domains().await;
    assert!(
        matches!(result, Err(Error::DeleteStalled { .. })),
        "expected DeleteStalled, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_on_empty_table_makes_no_del_call() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({ "action": "show" })))
        .respond_with(ok_call())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({ "action": "del" })))
        .respond_with(ok_call())
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(client.delete_bypass_stream_ipports().await.unwrap(), 0);
}

// ── IP group resolution ─────────────────────────────────────────────

#[tokio::test]
async fn test_bypass_ip_group_names_returns_chunk_groups() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .and(body_partial_json(json!({
            "func_name": "ipgroup",
            "action": "show",
            "param": { "FINDS": "group_name", "KEYWORDS": "cn" }
        })))
        .respond_with(show_rows(json!([
            { "id": 1, "comment": "IKUAI_BYPASS", "group_name": "cn_0" },
            { "id": 2, "comment": "IKUAI_BYPASS", "group_name": "cn_1" },
            { "id": 3, "comment": "", "group_name": "cn_2" },
            { "id": 4, "comment": "IKUAI_BYPASS", "group_name": "cnx_0" },
        ])))
        .mount(&server)
        .await;

    let names = client.bypass_ip_group_names("cn").await.unwrap();
    assert_eq!(names, vec!["cn_0".to_string(), "cn_1".to_string()]);
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Action/call"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.bypass_ip_group_names("cn").await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
