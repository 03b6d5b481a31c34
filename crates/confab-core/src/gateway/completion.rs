//! CompletionGateway trait definition.

use confab_types::completion::{CompletionRequest, CompletionResponse};
use confab_types::error::GatewayError;

/// Client for a single-turn, non-streaming chat-completion service.
///
/// Implementations live in confab-infra (e.g., `HttpCompletionGateway`).
pub trait CompletionGateway: Send + Sync {
    /// Send the request and return the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, GatewayError>> + Send;
}
