use crate::common::fixtures::requester;
use discord_bot::utils::communication::deliver;
use serde_json::{Value, json};
use serenity::all::CreateMessage;
use serenity::http::{Http, HttpBuilder};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer) -> Http {
    HttpBuilder::new("test-token")
        .proxy(server.uri())
        .ratelimiter_disabled(true)
        .build()
}

fn missing_permissions() -> ResponseTemplate {
    ResponseTemplate::new(403).set_body_json(json!({
        "code": 50013,
        "message": "Missing Permissions"
    }))
}

fn body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}

async fn requests_to(server: &MockServer, route: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == route)
        .collect()
}

#[tokio::test]
async fn forbidden_channel_falls_back_to_a_direct_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v10/channels/2000/messages"))
        .respond_with(missing_permissions())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v10/users/@me/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5000",
            "type": 1,
            "last_message_id": null,
            "recipients": [{
                "id": "4000",
                "username": "tester",
                "discriminator": "0",
                "global_name": null,
                "avatar": null
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v10/channels/5000/messages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let message = CreateMessage::new().content("Now playing: Song A");
    // The DM post answers 500, only the requests made on the way matter here.
    let _ = deliver(&client(&server), &requester(), message).await;

    let dm_channel = requests_to(&server, "/api/v10/users/@me/channels").await;
    assert_eq!(body(&dm_channel[0])["recipient_id"], json!("4000"));

    let direct = requests_to(&server, "/api/v10/channels/5000/messages").await;
    assert!(!direct.is_empty());
    let content = body(&direct[0])["content"].as_str().unwrap_or_default().to_string();
    assert!(content.starts_with("Hey, seems like I can't send any message in <#2000>"));
}

#[tokio::test]
async fn other_failures_are_returned_without_a_direct_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v10/channels/2000/messages"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 10003,
            "message": "Unknown Channel"
        })))
        .mount(&server)
        .await;

    let message = CreateMessage::new().content("Now playing: Song A");
    let result = deliver(&client(&server), &requester(), message).await;

    assert!(result.is_err());
    assert!(requests_to(&server, "/api/v10/users/@me/channels").await.is_empty());
}
