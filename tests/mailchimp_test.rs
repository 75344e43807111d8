//! HTTP-level tests for the Mailchimp client against a mock server.

use roster_sync::{
    AddOutcome, ListDirectory, ListTarget, MailchimpClient, MailchimpConfig, Profile, TargetError,
};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: client pointing at the mock server
fn client(server: &MockServer) -> MailchimpClient {
    MailchimpClient::with_http_client(
        server.uri(),
        MailchimpConfig {
            api_key: "secret-us6".to_string(),
            user: "roster-sync".to_string(),
        },
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn test_list_members_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/abc/members"))
        .and(basic_auth("roster-sync", "secret-us6"))
        .and(query_param("fields", "members.email_address,total_items"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [
                { "email_address": "a@x.com" },
                { "email_address": "b@x.com" }
            ],
            "total_items": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let members = client(&server).list("abc").list_members().await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.contains("a@x.com"));
    assert!(members.contains("b@x.com"));
}

#[tokio::test]
async fn test_list_members_follows_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/abc/members"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [{ "email_address": "a@x.com" }],
            "total_items": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lists/abc/members"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [{ "email_address": "b@x.com" }],
            "total_items": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let members = client(&server).get_all_emails("abc").await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn test_list_members_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/abc/members"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "API Key Invalid",
            "status": 401,
            "detail": "Your API key may be invalid."
        })))
        .mount(&server)
        .await;

    let err = client(&server).list("abc").list_members().await.unwrap_err();
    match err {
        TargetError::Rejected { status, title, .. } => {
            assert_eq!(status, 401);
            assert_eq!(title, "API Key Invalid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_add_member_sends_subscription() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lists/abc/members"))
        .and(basic_auth("roster-sync", "secret-us6"))
        .and(body_json(json!({
            "email_address": "ada@x.com",
            "status": "subscribed",
            "merge_fields": { "FNAME": "Ada", "LNAME": "Lovelace" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email_address": "ada@x.com",
            "status": "subscribed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server)
        .list("abc")
        .add_member(&Profile::with_full_name("ada@x.com", "Ada Lovelace"))
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::Added);
}

#[tokio::test]
async fn test_add_member_duplicate_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lists/abc/members"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Member Exists",
            "status": 400,
            "detail": "a@x.com is already a list member."
        })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .list("abc")
        .add_member(&Profile::from_email("a@x.com"))
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::AlreadyMember);
}

#[tokio::test]
async fn test_add_member_other_rejection_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lists/abc/members"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Invalid Resource",
            "status": 400,
            "detail": "looks fake or invalid"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .list("abc")
        .add_member(&Profile::from_email("a@x.com"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid Resource"));
}

#[tokio::test]
async fn test_add_member_invalid_email_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client(&server)
        .list("abc")
        .add_member(&Profile::from_email("not-an-email"))
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::InvalidEmail);
}

#[tokio::test]
async fn test_list_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/abc"))
        .and(query_param("fields", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Newsletter" })))
        .mount(&server)
        .await;

    let name = client(&server).list("abc").list_name().await.unwrap();
    assert_eq!(name, "Newsletter");
}

#[tokio::test]
async fn test_list_name_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client(&server).list("missing").list_name().await.unwrap_err();
    match err {
        TargetError::Rejected { status, detail, .. } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_enumerate_lists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists"))
        .and(query_param(
            "fields",
            "lists.id,lists.name,lists.stats.member_count,total_items",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lists": [
                { "id": "abc", "name": "Newsletter", "stats": { "member_count": 12 } },
                { "id": "def", "name": "Volunteers", "stats": { "member_count": 3 } }
            ],
            "total_items": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lists = client(&server).enumerate_lists().await.unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].id, "abc");
    assert_eq!(lists[0].member_count, 12);
    assert_eq!(lists[1].name, "Volunteers");
}

#[tokio::test]
async fn test_connection_failure_is_http_error() {
    let client = MailchimpClient::with_http_client(
        "http://127.0.0.1:1".to_string(),
        MailchimpConfig {
            api_key: "secret-us6".to_string(),
            user: "roster-sync".to_string(),
        },
        reqwest::Client::new(),
    );

    let err = client.get_all_emails("abc").await.unwrap_err();
    assert!(matches!(err, TargetError::HttpError(_)));
}
