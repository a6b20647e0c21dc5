//! Wire-format tests for `HttpBackend` against a mock knowledge base API

use kbchat::api::{ApiError, HttpBackend, QaBackend};
use kbchat::controller::{ChatController, SubmitOutcome};
use kbchat::render::ChatScreen;
use kbchat::session::Session;
use kbchat::storage::MemoryStore;
use kbchat::strings::JA;
use kbchat::types::{ChatMessage, Role, Source};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(format!("{}/prod", server.uri()))
}

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_query_sends_null_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "query": "What is X?", "conversationId": null })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversationId": "abc123",
                "response": "X is...",
                "sources": [{ "title": "Doc A", "url": "http://example.com/a" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend(&server)
            .submit_query("What is X?", None)
            .await
            .unwrap();

        assert_eq!(reply.new_conversation_id(), Some("abc123"));
        assert_eq!(reply.answer(), Some("X is..."));
        assert_eq!(
            reply.cited_sources(),
            [Source {
                title: Some("Doc A".into()),
                url: "http://example.com/a".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_follow_up_query_echoes_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .and(body_json(json!({ "query": "and Y?", "conversationId": "abc123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversationId": "abc123",
                "response": "Y is..."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend(&server)
            .submit_query("and Y?", Some("abc123"))
            .await
            .unwrap();
        assert_eq!(reply.answer(), Some("Y is..."));
        assert!(reply.cited_sources().is_empty());
    }

    #[tokio::test]
    async fn test_error_body_becomes_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": "Bedrock APIエラー: throttled" })),
            )
            .mount(&server)
            .await;

        let err = backend(&server).submit_query("q", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Backend(text) if text == "Bedrock APIエラー: throttled"));
    }

    #[tokio::test]
    async fn test_error_without_message_is_unspecified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({ "message": "Internal server error" })),
            )
            .mount(&server)
            .await;

        let err = backend(&server).submit_query("q", None).await.unwrap_err();
        assert!(matches!(err, ApiError::BackendUnspecified { status: 502 }));
    }

    #[tokio::test]
    async fn test_non_object_error_body_is_unspecified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!("oops")))
            .mount(&server)
            .await;

        let err = backend(&server).submit_query("q", None).await.unwrap_err();
        assert!(matches!(err, ApiError::BackendUnspecified { status: 500 }));
    }

    #[tokio::test]
    async fn test_non_object_success_body_renders_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let chat = ChatController::new(
            backend(&server),
            Session::restore(Box::new(store.clone()), "conversationId"),
            JA,
        );
        let mut screen = ChatScreen::new(JA);
        assert_eq!(chat.submit("q", &mut screen).await, SubmitOutcome::Answered);
        assert_eq!(screen.message_texts(), vec![(Role::User, "q".to_string())]);
        assert_eq!(store.get("conversationId"), None);
    }

    #[tokio::test]
    async fn test_unparseable_error_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .respond_with(ResponseTemplate::new(504).set_body_string("<html>Gateway Timeout</html>"))
            .mount(&server)
            .await;

        let err = backend(&server).submit_query("q", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let backend = HttpBackend::new("http://127.0.0.1:1/prod");
        let err = backend.submit_query("q", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}

mod history_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_history_by_conversation_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prod/history"))
            .and(query_param("conversationId", "abc123"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [
                    { "role": "user", "content": "What is X?" },
                    { "role": "assistant", "content": "X is..." }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let messages = backend(&server).fetch_history("abc123").await.unwrap();
        assert_eq!(
            messages,
            vec![
                ChatMessage::new(Role::User, "What is X?"),
                ChatMessage::new(Role::Assistant, "X is..."),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_messages_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prod/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let messages = backend(&server).fetch_history("abc123").await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_history_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prod/history"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "会話IDが必要です" })))
            .mount(&server)
            .await;

        let err = backend(&server).fetch_history("abc123").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_clear_sends_conversation_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/prod/history"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "conversationId": "abc123" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "会話履歴が削除されました" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        backend(&server).clear_history("abc123").await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/prod/history"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = backend(&server).clear_history("abc123").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}

mod end_to_end_tests {
    use super::*;

    #[tokio::test]
    async fn test_query_then_reload_restores_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .and(body_json(json!({ "query": "What is X?", "conversationId": null })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversationId": "abc123",
                "response": "X is...",
                "sources": [{ "title": "Doc A", "url": "http://example.com/a" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/prod/history"))
            .and(query_param("conversationId", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [
                    { "role": "user", "content": "What is X?" },
                    { "role": "assistant", "content": "X is..." }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let chat = ChatController::new(
            backend(&server),
            Session::restore(Box::new(store.clone()), "conversationId"),
            JA,
        );
        let mut screen = ChatScreen::new(JA);
        assert_eq!(
            chat.submit("What is X?", &mut screen).await,
            SubmitOutcome::Answered
        );
        assert_eq!(screen.source_lists(), vec![["Doc A".to_string()].as_slice()]);
        assert_eq!(store.get("conversationId").as_deref(), Some("abc123"));

        let reloaded = ChatController::new(
            backend(&server),
            Session::restore(Box::new(store.clone()), "conversationId"),
            JA,
        );
        let mut fresh = ChatScreen::new(JA);
        assert_eq!(reloaded.load_history(&mut fresh).await, 2);
        assert_eq!(fresh.message_texts(), screen.message_texts());
    }

    #[tokio::test]
    async fn test_cold_start_error_shows_friendly_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/query"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Bedrock APIエラー: The Aurora DB instance kb-db is resuming after being auto-paused. Please wait a few seconds and try again."
            })))
            .mount(&server)
            .await;

        let chat = ChatController::new(
            backend(&server),
            Session::restore(Box::new(MemoryStore::new()), "conversationId"),
            JA,
        );
        let mut screen = ChatScreen::new(JA);
        chat.submit("q", &mut screen).await;

        assert_eq!(
            screen.message_texts().last(),
            Some(&(Role::System, JA.cold_start.to_string()))
        );
        assert!(screen.submit_enabled);
    }
}
