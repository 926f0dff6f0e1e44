use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use gazette::mail::{GmailClient, MailAccess, MailError, OutboundMessage};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

const MESSAGES: &str = "/gmail/v1/users/me/messages";

fn client(server: &MockServer) -> GmailClient {
    GmailClient::new(&server.uri(), "test-token")
        .unwrap()
        .with_retry(2, Duration::from_millis(1))
}

#[tokio::test]
async fn test_search_sends_query_and_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MESSAGES))
        .and(query_param("q", "from:team@rundown.ai after:2024/11/05"))
        .and(query_param("maxResults", "2"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {"id": "a1", "threadId": "t1"},
                {"id": "a2", "threadId": "t2"},
                {"id": "a3", "threadId": "t3"}
            ],
            "resultSizeEstimate": 3
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let refs = client(&mock_server)
        .search("from:team@rundown.ai after:2024/11/05", 2)
        .await
        .unwrap();

    let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
    assert_eq!(refs[0].thread_id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_search_without_matches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultSizeEstimate": 0})))
        .mount(&mock_server)
        .await;

    let refs = client(&mock_server).search("from:nobody@x.io", 10).await.unwrap();
    assert!(refs.is_empty());
}

#[tokio::test]
async fn test_fetch_full_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/18c0ffee", MESSAGES)))
        .and(query_param("format", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "18c0ffee",
            "threadId": "18c0ffee",
            "labelIds": ["INBOX", "UNREAD"],
            "snippet": "Good morning",
            "internalDate": "1730966400000",
            "payload": {
                "partId": "",
                "mimeType": "multipart/alternative",
                "headers": [
                    {"name": "Subject", "value": "Daily"},
                    {"name": "From", "value": "The Neuron <newsletter@theneurondaily.com>"}
                ],
                "body": {"size": 0},
                "parts": [
                    {
                        "partId": "0",
                        "mimeType": "text/plain",
                        "body": {"size": 12, "data": URL_SAFE.encode("Good morning")}
                    },
                    {
                        "partId": "1",
                        "mimeType": "text/html",
                        "body": {"size": 19, "data": URL_SAFE.encode("<p>Good morning</p>")}
                    }
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    let message = client(&mock_server).fetch("18c0ffee").await.unwrap();

    assert_eq!(message.thread_id, "18c0ffee");
    assert_eq!(message.label_ids, vec!["INBOX", "UNREAD"]);
    assert_eq!(message.headers().get("subject"), Some("Daily"));
    let payload = message.payload.unwrap();
    assert_eq!(payload.parts.as_ref().map(Vec::len), Some(2));
    assert_eq!(payload.parts.unwrap()[1].mime_type, "text/html");
}

#[tokio::test]
async fn test_fetch_404_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/missing", MESSAGES)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch("missing").await;
    match result {
        Err(MailError::NotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_401_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).search("x", 1).await;
    assert!(matches!(result, Err(MailError::Unauthorized)));
}

#[tokio::test]
async fn test_500_is_retried_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "r1", "threadId": "r1"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let refs = client(&mock_server).search("x", 5).await.unwrap();
    assert_eq!(refs.len(), 1);
}

#[tokio::test]
async fn test_persistent_500_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    match client(&mock_server).search("x", 5).await {
        Err(MailError::Http { status, retriable }) => {
            assert_eq!(status.as_u16(), 503);
            assert!(retriable);
        }
        other => panic!("Expected HTTP 503 error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_429_honors_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/m1", MESSAGES)))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/m1", MESSAGES)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
        .mount(&mock_server)
        .await;

    let message = client(&mock_server).fetch("m1").await.unwrap();
    assert_eq!(message.id, "m1");
    assert!(message.payload.is_none());
}

#[tokio::test]
async fn test_malformed_response_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/bad", MESSAGES)))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch("bad").await;
    assert!(matches!(result, Err(MailError::Decode(_))));
}

#[tokio::test]
async fn test_send_posts_raw_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/send", MESSAGES)))
        .and(body_partial_json(json!({"threadId": "t-9"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "sent1", "threadId": "t-9"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let message = OutboundMessage::new("friend@example.com", "Digest", "See you soon")
        .replying_to("<abc@mail.example.com>", "t-9");
    let sent = client(&mock_server).send(&message).await.unwrap();
    assert_eq!(sent.id, "sent1");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let raw = URL_SAFE.decode(body["raw"].as_str().unwrap()).unwrap();
    let rfc5322 = String::from_utf8(raw).unwrap();
    assert!(rfc5322.contains("To: friend@example.com\r\n"));
    assert!(rfc5322.contains("In-Reply-To: <abc@mail.example.com>\r\n"));
    assert!(rfc5322.ends_with("See you soon"));
}

#[tokio::test]
async fn test_send_rejects_header_injection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let message = OutboundMessage::new("a@x.io\r\nBcc: evil@x.io", "Hi", "body");
    let result = client(&mock_server).send(&message).await;
    assert!(matches!(result, Err(MailError::InvalidMessage(_))));
}

#[tokio::test]
async fn test_send_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/send", MESSAGES)))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let message = OutboundMessage::new("a@x.io", "Hi", "body");
    let result = client(&mock_server).send(&message).await;
    assert!(matches!(result, Err(MailError::Http { .. })));
}
