//! OpenAI-compatible chat completions client with tool calling.

mod client;
mod error;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(mock_server: &MockServer) -> LlmClient {
        LlmClient::new(
            "test-api-key",
            mock_server.uri(),
            "test-model",
            Duration::from_secs(30),
        )
        .unwrap()
    }

    fn text_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1677652288,
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 15,
                "total_tokens": 25
            }
        })
    }

    fn registration_tool() -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinitionApi {
                name: "get_all_registrations".into(),
                description: "Get all user registrations".into(),
                parameters: serde_json::json!({"type": "object", "properties": {}}),
            },
        }
    }

    #[tokio::test]
    async fn test_chat_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Hello! How can I help?")))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.chat(&[Message::user("Hello")], Some(0.7), None).await;

        assert_eq!(result.unwrap(), "Hello! How can I help?");
    }

    #[tokio::test]
    async fn test_chat_with_tools_returns_tool_calls() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "chatcmpl-456",
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_all_registrations", "arguments": "{}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "tool_choice": "auto",
                "tools": [{"type": "function", "function": {"name": "get_all_registrations"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let tools = [registration_tool()];
        let response = client
            .chat_with_tools(&[Message::user("Show everyone")], None, None, Some(tools.as_slice()))
            .await
            .unwrap();

        assert!(response.has_tool_calls());
        assert!(response.content.is_none());
        assert_eq!(response.finish_reason, "tool_calls");
        let calls = response.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "get_all_registrations");
    }

    #[tokio::test]
    async fn test_chat_omits_empty_tool_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        client
            .chat_with_tools(&[Message::user("Hi")], None, None, Some(&[][..]))
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[tokio::test]
    async fn test_chat_empty_response() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "chatcmpl-123",
            "model": "test-model",
            "choices": [],
            "usage": null
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.chat(&[Message::user("Hello")], Some(0.7), None).await;
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_chat_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.chat(&[Message::user("Hello")], Some(0.7), None).await;
        assert!(matches!(result, Err(LlmError::RateLimit)));
    }

    #[tokio::test]
    async fn test_chat_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.chat(&[Message::user("Hello")], Some(0.7), None).await;
        assert!(matches!(result, Err(LlmError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_chat_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.chat(&[Message::user("Hello")], None, None).await;
        match result {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_with_retry_success_on_first_try() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Success on first try")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .chat_with_retry(&[Message::user("Hello")], None, None, None, Some(3))
            .await
            .unwrap();
        assert_eq!(result.content.as_deref(), Some("Success on first try"));
    }

    #[tokio::test]
    async fn test_chat_with_retry_gives_up_after_max_retries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .chat_with_retry(&[Message::user("Hello")], None, None, None, Some(2))
            .await;
        assert!(matches!(result, Err(LlmError::RateLimit)));
    }

    #[tokio::test]
    async fn test_chat_with_retry_zero_retries_returns_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .chat_with_retry(&[Message::user("Hello")], None, None, None, Some(0))
            .await;
        assert!(matches!(
            result,
            Err(LlmError::Api { status: 503, ref message }) if message == "overloaded"
        ));
    }

    #[tokio::test]
    async fn test_chat_with_retry_recovers_after_transient_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Recovered")))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .chat_with_retry(&[Message::user("Hello")], None, None, None, Some(3))
            .await
            .unwrap();
        assert_eq!(result.content.as_deref(), Some("Recovered"));
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_chat_with_retry_does_not_retry_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .chat_with_retry(&[Message::user("Hello")], None, None, None, Some(3))
            .await;
        assert!(matches!(result, Err(LlmError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{"id": "test-model", "object": "model", "owned_by": "system"}]
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        assert!(client.health_check().await);
        let models = client.list_models().await.unwrap();
        assert_eq!(models[0].id, "test-model");
    }

    #[tokio::test]
    async fn test_health_check_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        assert!(!client.health_check().await);
    }

    #[test]
    fn test_message_constructors() {
        let system = Message::system("You are a registration assistant");
        assert_eq!(system.role, Role::System);
        assert_eq!(system.content.as_deref(), Some("You are a registration assistant"));

        let tool = Message::tool_result("call_1", "No registrations found.");
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_1"));

        let json = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "Hello"}));
    }

    #[test]
    fn test_model_getter() {
        let client = LlmClient::new("key", "http://localhost:1/", "gpt-4o-mini", Duration::from_secs(1)).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
