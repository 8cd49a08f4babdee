use config::{HttpConfig, LineConfig};
use delivery::{DeliveryFormatter, LineClient, QuizDelivery, create_line_client};
use errors::DeliveryError;
use quiz_core::traits::MessageSender;
use quiz_core::types::{Question, Quiz};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUSH_PATH: &str = "/v2/bot/message/push";

fn line_config(server: &MockServer) -> LineConfig {
    LineConfig {
        channel_access_token: "line-token".to_string(),
        user_id: "U-recipient".to_string(),
        base_url: server.uri()
    }
}

fn client(server: &MockServer) -> LineClient {
    LineClient::new(line_config(server), &HttpConfig::default()).unwrap()
}

#[tokio::test]
async fn test_push_text_sends_bearer_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(header("authorization", "Bearer line-token"))
        .and(body_partial_json(json!({
            "to": "U-recipient",
            "messages": [{ "type": "text", "text": "hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .push_text("U-recipient", "hello")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_push_text_status_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(body_partial_json(json!({ "to": "limited" })))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(body_partial_json(json!({ "to": "denied" })))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(body_partial_json(json!({ "to": "broken" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client.push_text("limited", "x").await.unwrap_err();
    assert!(matches!(err, DeliveryError::RateLimited { retry_after: 5 }));

    let err = client.push_text("denied", "x").await.unwrap_err();
    assert!(matches!(err, DeliveryError::Unauthorized { ref reason } if reason == "invalid token"));

    let err = client.push_text("broken", "x").await.unwrap_err();
    assert!(matches!(err, DeliveryError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_quiz_delivery_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let sender = create_line_client(line_config(&server), &HttpConfig::default()).unwrap();
    let delivery = QuizDelivery::new(sender, "U-recipient")
        .with_formatter(DeliveryFormatter::with_max_length(800));

    let quiz = Quiz {
        title: "2024-03-01 ~ 2024-03-07 study notes".to_string(),
        questions: (1..=4)
            .map(|n| Question {
                question: format!("What does borrow rule {} forbid? {}", n, "detail ".repeat(20)),
                choices: vec![
                    "Aliasing with mutation".to_string(),
                    "Moves".to_string(),
                    "Copies".to_string(),
                    "Clones".to_string(),
                ],
                correct_index: 0,
                explanation: format!("Rule {} {}", n, "because ".repeat(20))
            })
            .collect()
    };

    let sent = delivery.send_quiz(&quiz).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(sent >= 2);
    assert_eq!(requests.len(), sent);
    for request in &requests {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let text = body["messages"][0]["text"].as_str().unwrap();
        assert!(delivery::message_length(text) <= 800);
    }
}
