//! HTTP implementation of the message store.
//!
//! Wire contract with the backend:
//!
//! - `POST /user` body `{"name": ...}` answers `{"_id": ...}`
//! - `GET /user/{id}` answers `{"messages": [...]}`
//! - `POST /messages` body `{"userId": ..., "messages": [...]}`
//!
//! Messages travel as `{role, content}` pairs; local ids and timestamps
//! are minted on load.

use crate::store::MessageStore;
use async_trait::async_trait;
use bestself_conversation::{Message, WireMessage};
use bestself_core::{RemoteError, StoreUserId};
use serde::{Deserialize, Serialize};

/// Message store backed by the conversation history REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateUserResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Serialize)]
struct SaveMessagesRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    messages: Vec<WireMessage>,
}

impl HttpStore {
    /// Creates a store client for the given backend base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl MessageStore for HttpStore {
    async fn create_user(&self, name: &str) -> Result<StoreUserId, RemoteError> {
        let response = self
            .client
            .post(self.url("user"))
            .json(&CreateUserRequest { name })
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                reason: e.to_string(),
            })?;

        let body: CreateUserResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse {
                reason: e.to_string(),
            })?;

        Ok(StoreUserId::new(body.id))
    }

    async fn save_messages(
        &self,
        id: &StoreUserId,
        messages: &[Message],
    ) -> Result<(), RemoteError> {
        let request = SaveMessagesRequest {
            user_id: id.as_str(),
            messages: messages.iter().map(WireMessage::from).collect(),
        };

        let response = self
            .client
            .post(self.url("messages"))
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                reason: e.to_string(),
            })?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn load_messages(&self, id: &StoreUserId) -> Result<Vec<Message>, RemoteError> {
        let response = self
            .client
            .get(self.url(&format!("user/{}", id.as_str())))
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                reason: e.to_string(),
            })?;

        let record: UserRecord = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse {
                reason: e.to_string(),
            })?;

        Ok(record.messages.into_iter().map(Message::from).collect())
    }
}
