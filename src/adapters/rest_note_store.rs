use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::note::format_timestamp;
use crate::domain::{DomainError, NewNote, Note};
use crate::ports::NoteStore;

/// Wire shape of a stored note record.
#[derive(Deserialize)]
struct NoteRecord {
    id: String,
    content: String,
    /// ISO-8601 creation time as written at save.
    timestamp: String,
}

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

/// Note store backed by a remote REST collection.
///
/// - `POST {base}` with `{ content, timestamp }` inserts and returns the id.
/// - `DELETE {base}/{id}` removes one record.
/// - `GET {base}?order=desc` lists records newest-first (server-side order
///   by creation timestamp).
pub struct RestNoteStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestNoteStore {
    /// Create a new store client for the given collection URL.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not valid.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, DomainError> {
        Url::parse(base_url).map_err(|e| DomainError::HttpRequest(e.to_string()))?;

        Ok(Self {
            client: super::HTTP_CLIENT.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }
}

#[async_trait]
impl NoteStore for RestNoteStore {
    async fn insert(&self, note: &NewNote) -> Result<String, DomainError> {
        let response = self
            .request(self.client.post(&self.base_url))
            .json(note)
            .send()
            .await
            .map_err(|e| DomainError::NoteStore(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::NoteStore(format!(
                "insert failed {status}: {body}"
            )));
        }

        let created: InsertResponse = response
            .json()
            .await
            .map_err(|e| DomainError::NoteStore(e.to_string()))?;

        tracing::info!(id = %created.id, "note saved");
        Ok(created.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let response = self
            .request(self.client.delete(format!("{}/{id}", self.base_url)))
            .send()
            .await
            .map_err(|e| DomainError::NoteStore(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::NoteStore(format!(
                "delete failed {status}: {body}"
            )));
        }

        tracing::info!(id = %id, "note deleted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Note>, DomainError> {
        let response = self
            .request(self.client.get(format!("{}?order=desc", self.base_url)))
            .send()
            .await
            .map_err(|e| DomainError::NoteStore(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::NoteStore(format!(
                "list failed {status}: {body}"
            )));
        }

        let records: Vec<NoteRecord> = response
            .json()
            .await
            .map_err(|e| DomainError::NoteStore(e.to_string()))?;

        Ok(records
            .into_iter()
            .map(|r| Note {
                id: r.id,
                content: r.content,
                timestamp: format_timestamp(&r.timestamp),
            })
            .collect())
    }
}
