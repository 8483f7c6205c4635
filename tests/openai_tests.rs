//! OpenAI-compatible HTTP clients against a mocked API server.

use sabor::llm::{GenerationParams, LLMClient, OpenAIClient};
use sabor::rag::embeddings::{EmbeddingService, OpenAIEmbeddings};
use sabor::types::{AppError, ChatMessage};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn embeddings_client(server: &MockServer) -> OpenAIEmbeddings {
    OpenAIEmbeddings::new(
        "sk-test".to_string(),
        format!("{}/v1/", server.uri()),
        "text-embedding-3-small".to_string(),
    )
}

fn chat_client(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(
        "sk-test".to_string(),
        format!("{}/v1", server.uri()),
        "gpt-4o-mini".to_string(),
    )
}

// ============= Embeddings =============

#[tokio::test]
async fn test_embed_batch_restores_input_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "input": ["Ajiaco cuesta $12.000", "Bandeja Paisa vale $15.000"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 14, "total_tokens": 14}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = embeddings_client(&server);
    let batch = client
        .embed_batch(&[
            "Ajiaco cuesta\n$12.000".to_string(),
            "Bandeja Paisa vale $15.000".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(batch.embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    assert_eq!(batch.tokens_used, 14);
    assert_eq!(client.model_name(), "text-embedding-3-small");
}

#[tokio::test]
async fn test_embed_single_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.25, 0.5, 0.25]}],
            "usage": {"total_tokens": 6}
        })))
        .mount(&server)
        .await;

    let vector = embeddings_client(&server)
        .embed("¿Cuánto cuesta el ajiaco?")
        .await
        .unwrap();
    assert_eq!(vector, vec![0.25, 0.5, 0.25]);
}

#[tokio::test]
async fn test_embed_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit reached"))
        .mount(&server)
        .await;

    match embeddings_client(&server).embed("ajiaco").await {
        Err(AppError::ExternalService(msg)) => {
            assert!(msg.contains("429"));
            assert!(msg.contains("Rate limit reached"));
        }
        other => panic!("expected ExternalService, got {:?}", other),
    }
}

#[tokio::test]
async fn test_embed_count_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [1.0]}]
        })))
        .mount(&server)
        .await;

    let result = embeddings_client(&server)
        .embed_batch(&["uno".to_string(), "dos".to_string()])
        .await;
    assert!(matches!(result, Err(AppError::ExternalService(_))));
}

#[tokio::test]
async fn test_embed_blank_entry_never_hits_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = embeddings_client(&server)
        .embed_batch(&["menu".to_string(), "  ".to_string()])
        .await;
    match result {
        Err(AppError::EmptyInput(msg)) => assert!(msg.contains("entry 1")),
        other => panic!("expected EmptyInput, got {:?}", other),
    }
}

// ============= Chat Completions =============

#[tokio::test]
async fn test_chat_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 500,
            "messages": [
                {"role": "system", "content": "Eres un mesero."},
                {"role": "user", "content": "¿Cuánto cuesta el ajiaco?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "El ajiaco cuesta $12.000 COP."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 40, "completion_tokens": 10, "total_tokens": 50}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = chat_client(&server);
    let completion = client
        .complete(
            &[
                ChatMessage::system("Eres un mesero."),
                ChatMessage::user("¿Cuánto cuesta el ajiaco?"),
            ],
            &GenerationParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(completion.text, "El ajiaco cuesta $12.000 COP.");
    assert_eq!(completion.tokens_used, 50);
    assert_eq!(client.model_name(), "gpt-4o-mini");
}

#[tokio::test]
async fn test_chat_completion_without_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hola"}}]
        })))
        .mount(&server)
        .await;

    let completion = chat_client(&server)
        .complete(&[ChatMessage::user("hola")], &GenerationParams::default())
        .await
        .unwrap();
    assert_eq!(completion.tokens_used, 0);
}

#[tokio::test]
async fn test_chat_completion_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = chat_client(&server)
        .complete(&[ChatMessage::user("hola")], &GenerationParams::default())
        .await;
    assert!(matches!(result, Err(AppError::ExternalService(msg)) if msg.contains("500")));
}

#[tokio::test]
async fn test_chat_completion_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let result = chat_client(&server)
        .complete(&[ChatMessage::user("hola")], &GenerationParams::default())
        .await;
    assert!(matches!(result, Err(AppError::ExternalService(_))));
}
