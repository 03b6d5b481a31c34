//! HttpCompletionGateway -- [`CompletionGateway`] for OpenAI-compatible
//! `/chat/completions` endpoints.
//!
//! The bearer credential is wrapped in [`secrecy::SecretString`] and is only
//! exposed when building the `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use confab_core::gateway::CompletionGateway;
use confab_types::completion::{CompletionRequest, CompletionResponse};
use confab_types::error::GatewayError;

use super::{decode_json, join_url, transport_error};

/// Completion service client.
///
/// Has no `Debug` impl; the key must never reach logs.
pub struct HttpCompletionGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl HttpCompletionGateway {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CompletionGateway for HttpCompletionGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, GatewayError> {
        let url = join_url(&self.base_url, "/chat/completions");
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => GatewayError::AuthenticationFailed,
                code => GatewayError::Status { status: code, body },
            });
        }

        let completion: CompletionResponse = decode_json(response).await?;
        // At least one choice is required.
        completion.first_message()?;
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_types::message::Message;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> HttpCompletionGateway {
        HttpCompletionGateway::new(server.uri(), SecretString::from("test-key"))
    }

    fn empty_request() -> CompletionRequest {
        CompletionRequest::from_history("deepseek-chat", std::iter::empty::<&Message>())
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "id": "cmpl-1",
            "object": "chat.completion",
            "model": "deepseek-chat",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
        })
    }

    #[tokio::test]
    async fn complete_sends_exact_wire_body_with_bearer() {
        let server = MockServer::start().await;
        let history = [Message::user("hi")];
        let request = CompletionRequest::from_history("deepseek-chat", &history);

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("hello")))
            .expect(1)
            .mount(&server)
            .await;

        let response = gateway(&server).complete(&request).await.unwrap();
        assert_eq!(response.first_message().unwrap().content, "hello");
    }

    #[tokio::test]
    async fn complete_maps_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = gateway(&server).complete(&empty_request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn complete_maps_other_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = gateway(&server).complete(&empty_request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn complete_requires_a_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = gateway(&server).complete(&empty_request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn complete_rejects_unexpected_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let err = gateway(&server).complete(&empty_request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }
}
