use super::{ApiError, ApiResult, QaBackend};
use crate::types::{ChatMessage, QueryReply, Role};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// reqwest client for the knowledge base API
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    conversation_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearRequest<'a> {
    conversation_id: &'a str,
}

#[derive(Deserialize)]
struct HistoryMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Option<Vec<HistoryMessage>>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn into_messages(history: HistoryResponse) -> Vec<ChatMessage> {
    history
        .messages
        .unwrap_or_default()
        .into_iter()
        .filter_map(|msg| match Role::parse(&msg.role) {
            Some(role) => Some(ChatMessage::new(role, msg.content)),
            None => {
                tracing::debug!(role = %msg.role, "skipping history message with unknown role");
                None
            }
        })
        .collect()
}

/// Turn a non-2xx `/query` body into the error the user should see.
///
/// Any JSON without an `error` string (including non-object JSON) is an
/// unspecified backend error; only unparseable bodies count as decode errors.
fn query_failure(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("error").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => ApiError::Backend(text.to_string()),
            _ => ApiError::BackendUnspecified { status },
        },
        Err(err) => ApiError::from(err),
    }
}

/// Decode a 2xx `/query` body. JSON that is not an object carries no
/// fields, so it reads as an empty reply.
fn query_reply(body: &str) -> ApiResult<QueryReply> {
    let value: Value = serde_json::from_str(body)?;
    if value.is_object() {
        Ok(serde_json::from_value(value)?)
    } else {
        tracing::debug!(%value, "query reply is not an object");
        Ok(QueryReply::default())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QaBackend for HttpBackend {
    async fn fetch_history(&self, conversation_id: &str) -> ApiResult<Vec<ChatMessage>> {
        tracing::debug!(%conversation_id, "fetching history");
        let response = self
            .client
            .get(self.endpoint("history"))
            .query(&[("conversationId", conversation_id)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let history: HistoryResponse = serde_json::from_str(&body)?;
        Ok(into_messages(history))
    }

    async fn submit_query(
        &self,
        query: &str,
        conversation_id: Option<&str>,
    ) -> ApiResult<QueryReply> {
        tracing::debug!(?conversation_id, "submitting query");
        let response = self
            .client
            .post(self.endpoint("query"))
            .json(&QueryRequest {
                query,
                conversation_id,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            query_reply(&body)
        } else {
            Err(query_failure(status.as_u16(), &body))
        }
    }

    async fn clear_history(&self, conversation_id: &str) -> ApiResult<()> {
        tracing::debug!(%conversation_id, "clearing history");
        let response = self
            .client
            .delete(self.endpoint("history"))
            .json(&ClearRequest { conversation_id })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
