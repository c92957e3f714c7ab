//! LLMGateway: the oracle boundary for the hydrofind pipeline.
//! Classification, parameter extraction, quantity extraction, and batch
//! splitting, all backed by a one-shot chat-completions call.

pub mod gateway;
pub mod oracle;
pub mod prompts;

pub use gateway::LlmGateway;
pub use oracle::OracleClient;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use hydrofind_shared::{ComponentType, ExtractedData};

    fn gateway(server_url: &str) -> LlmGateway {
        LlmGateway::new(OracleClient::new(
            server_url.to_string(),
            "test-key".to_string(),
            "test-model".to_string(),
            5,
            256,
        ))
    }

    fn chat_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"content": content}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn classify_matches_exact_closed_set_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("fittings"))
            .create_async()
            .await;

        let result = gateway(&server.url()).classify("угловой штуцер").await.unwrap();
        assert_eq!(result, Some(ComponentType::Fittings));
    }

    #[tokio::test]
    async fn classify_returns_none_when_oracle_answer_is_outside_closed_set() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("widget"))
            .create_async()
            .await;

        let result = gateway(&server.url()).classify("что-то странное").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn extract_params_builds_typed_record_from_json_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(r#"{"standard": "DKOL", "Dy": 10}"#))
            .create_async()
            .await;

        let result = gateway(&server.url())
            .extract_params("fitting DKOL 10", ComponentType::Fittings)
            .await
            .unwrap()
            .unwrap();
        match result {
            ExtractedData::Fitting(data) => assert_eq!(data.dy, Some(10)),
            other => panic!("expected Fitting, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extract_params_falls_back_to_raw_response_on_non_json_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("I am not sure"))
            .create_async()
            .await;

        let result = gateway(&server.url())
            .extract_params("fitting", ComponentType::Fittings)
            .await
            .unwrap()
            .unwrap();
        match result {
            ExtractedData::Raw(value) => assert_eq!(value["raw_response"], "I am not sure"),
            other => panic!("expected Raw, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extract_quantity_parses_the_leading_number() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("5"))
            .create_async()
            .await;

        let result = gateway(&server.url()).extract_quantity("нужно 5 штук").await.unwrap();
        assert_eq!(result, Some(5));
    }

    #[tokio::test]
    async fn extract_quantity_returns_none_when_oracle_reports_unspecified() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("не указано"))
            .create_async()
            .await;

        let result = gateway(&server.url()).extract_quantity("без количества").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn split_batch_splits_multiline_oracle_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("fitting DKOL\nadapter M10\n"))
            .create_async()
            .await;

        let result = gateway(&server.url()).split_batch("fitting DKOL, adapter M10").await.unwrap();
        assert_eq!(result, vec!["fitting DKOL".to_string(), "adapter M10".to_string()]);
    }

    #[tokio::test]
    async fn split_batch_falls_back_to_single_line_when_oracle_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(""))
            .create_async()
            .await;

        let result = gateway(&server.url()).split_batch("single item").await.unwrap();
        assert_eq!(result, vec!["single item".to_string()]);
    }

    #[tokio::test]
    async fn oracle_server_error_surfaces_as_transient() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .create_async()
            .await;

        let err = gateway(&server.url()).classify("fitting").await.unwrap_err();
        assert!(err.is_transient());
    }
}
