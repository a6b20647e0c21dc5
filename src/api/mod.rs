//! Knowledge base API client
//!
//! The backend exposes three JSON endpoints:
//!
//! - `GET  {base}/history?conversationId=..` - past messages of a conversation
//! - `POST {base}/query` - ask a question, optionally continuing a conversation
//! - `DELETE {base}/history` - forget a conversation
//!
//! # Architecture
//!
//! - `QaBackend` - the seam the chat controller talks to
//! - `http` - reqwest implementation of `QaBackend`
//! - `classify` - maps failures to the text shown in the transcript
//!
//! # Usage
//!
//! ```rust,no_run
//! use kbchat::api::{HttpBackend, QaBackend};
//!
//! # async fn example() -> Result<(), kbchat::api::ApiError> {
//! let backend = HttpBackend::new("https://example.com/prod");
//! let reply = backend.submit_query("What is X?", None).await?;
//! println!("{:?}", reply.response);
//! # Ok(())
//! # }
//! ```
mod classify;
mod http;

use crate::types::{ChatMessage, QueryReply};
use async_trait::async_trait;

pub use classify::{COLD_START_MARKERS, FailureKind, classify, is_cold_start};
pub use http::HttpBackend;

// ============================================
// Error Types
// ============================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connectivity, CORS, DNS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx on an endpoint whose error body is not shown to the user.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Non-2xx with a `{ "error": "..." }` body.
    #[error("{0}")]
    Backend(String),

    /// Non-2xx with a JSON body that carries no `error` text.
    #[error("backend returned status {status} without an error message")]
    BackendUnspecified { status: u16 },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QaBackend {
    /// Messages of a stored conversation, oldest first. Empty when the
    /// backend has none.
    async fn fetch_history(&self, conversation_id: &str) -> ApiResult<Vec<ChatMessage>>;

    async fn submit_query(
        &self,
        query: &str,
        conversation_id: Option<&str>,
    ) -> ApiResult<QueryReply>;

    async fn clear_history(&self, conversation_id: &str) -> ApiResult<()>;
}
