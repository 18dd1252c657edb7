//! HTTP-level tests for OpenAIProvider against a mock server

use std::sync::Arc;

use sia_core::Topic;
use sia_llm::{Completer, LLMError, OpenAIProvider, TopicRouter};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_openai_completion_uses_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("listing")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("test-key").with_base_url(mock_server.uri());
    let reply = provider.complete("hello").await.unwrap();
    assert_eq!(reply, "listing");
}

#[tokio::test]
async fn test_azure_completion_uses_deployment_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/sia-gpt/chat/completions"))
        .and(query_param("api-version", "2024-02-15-preview"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("brand")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("azure-key")
        .with_base_url(mock_server.uri())
        .with_model("sia-gpt")
        .with_api_version("2024-02-15-preview");
    assert_eq!(provider.complete("hello").await.unwrap(), "brand");
}

#[tokio::test]
async fn test_server_error_is_reported_as_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string(r#"{"error": "Service Unavailable"}"#),
        )
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("k").with_base_url(mock_server.uri());
    match provider.complete("hello").await {
        Err(LLMError::Api(message)) => assert!(message.contains("503")),
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": []
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("k").with_base_url(mock_server.uri());
    assert!(matches!(
        provider.complete("hello").await,
        Err(LLMError::EmptyResponse)
    ));
}

#[tokio::test]
async fn test_router_uses_provider_for_ambiguous_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Brand")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("k").with_base_url(mock_server.uri());
    let router = TopicRouter::new(Some(Arc::new(provider)));
    assert_eq!(
        router.route("my request has been waiting for days", None).await,
        Some(Topic::Brand)
    );
}

#[tokio::test]
async fn test_router_survives_provider_outage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("k").with_base_url(mock_server.uri());
    let router = TopicRouter::new(Some(Arc::new(provider)));
    assert_eq!(router.route("hello there", None).await, None);
}
