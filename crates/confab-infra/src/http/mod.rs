//! reqwest implementations of the two remote gateways.
//!
//! Neither client sets a request timeout: a call that hangs stalls only the
//! store operation waiting on it.

pub mod completion;
pub mod session;

pub use completion::HttpCompletionGateway;
pub use session::HttpSessionGateway;

use confab_types::error::GatewayError;
use serde::de::DeserializeOwned;

/// Join a base URL and an absolute path, tolerating a trailing slash on the base.
fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(format!("HTTP request failed: {err}"))
}

/// Turn a non-success response into [`GatewayError::Status`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    response
        .json()
        .await
        .map_err(|e| GatewayError::MalformedResponse(format!("failed to parse response: {e}")))
}
