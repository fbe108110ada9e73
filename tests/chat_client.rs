use futures_util::StreamExt;
use rust_paperhub::config::AiConfig;
use rust_paperhub::errors::PaperHubError;
use rust_paperhub::models::chat::requests::{ChatMessage, ChatRole};
use rust_paperhub::services::chat::client::ChatClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: String) -> AiConfig {
    AiConfig {
        base_url,
        api_key: "sk-test".to_string(),
        model: "test-model".to_string(),
        max_tokens: 256,
        max_context_chars: 30000,
        max_extract_chars: 50000,
        timeout: 5,
    }
}

fn question() -> Vec<ChatMessage> {
    vec![ChatMessage {
        role: ChatRole::User,
        content: "Summarise question 1".to_string(),
    }]
}

#[tokio::test]
async fn complete_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "messages": [
                { "role": "system", "content": "You are a tutor." },
                { "role": "user", "content": "Summarise question 1" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "It asks about supply." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&config(server.uri())).unwrap();
    let answer = client
        .complete("You are a tutor.", &question())
        .await
        .unwrap();
    assert_eq!(answer, "It asks about supply.");
}

#[tokio::test]
async fn stream_yields_content_deltas() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Supply \"}}]}\n\n",
        ": keep-alive\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"and demand\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let client = ChatClient::new(&config(format!("{}/", server.uri()))).unwrap();
    let stream = client.stream("You are a tutor.", &question()).await.unwrap();
    let chunks: Vec<_> = Box::pin(stream).collect().await;

    let text: String = chunks
        .into_iter()
        .map(|chunk| String::from_utf8(chunk.unwrap().to_vec()).unwrap())
        .collect();
    assert_eq!(text, "Supply and demand");
}

#[tokio::test]
async fn rate_limited_upstream_reports_busy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = ChatClient::new(&config(server.uri())).unwrap();
    let err = client
        .complete("You are a tutor.", &question())
        .await
        .unwrap_err();
    assert!(matches!(err, PaperHubError::ExternalApi(_)));
    assert!(err.message().contains("busy"));
}
