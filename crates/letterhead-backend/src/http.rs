//! HTTP implementation of [`DocumentService`].

use crate::service::DocumentService;
use crate::wire;
use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use letterhead_core::{LetterheadError, MutationBatch, Result, Snapshot};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://docs-api.example.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Batch-update request body.
#[derive(Debug, Serialize)]
struct BatchUpdateRequest {
    requests: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentRequest<'a> {
    title: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentResponse {
    document_id: String,
}

#[derive(Debug, Serialize)]
struct ResolveFolderRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveFolderResponse {
    folder_id: String,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: String,
}

/// `reqwest` client for the remote word-processing backend.
#[derive(Debug, Clone)]
pub struct HttpDocumentService {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpDocumentService {
    /// Creates a client against the given base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> AnyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads the API token from `LETTERHEAD_API_TOKEN`; the base URL can be
    /// overridden with `LETTERHEAD_API_BASE`.
    ///
    /// # Errors
    /// Returns an error if `LETTERHEAD_API_TOKEN` is not set or HTTP client
    /// creation fails.
    pub fn from_env() -> AnyResult<Self> {
        let api_token = env::var("LETTERHEAD_API_TOKEN")
            .context("LETTERHEAD_API_TOKEN environment variable not set")?;
        let base_url =
            env::var("LETTERHEAD_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, api_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Maps a non-success response to the `(status, message)` error shape.
    async fn error_from(response: reqwest::Response) -> LetterheadError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        backend_error(status, body)
    }
}

/// Extracts the backend's error message from the response body, falling back
/// to the raw body when it is not the structured error shape.
fn backend_error(status: u16, body: String) -> LetterheadError {
    let message = serde_json::from_str::<WireErrorResponse>(&body)
        .map(|wire| wire.error.message)
        .unwrap_or(body);
    LetterheadError::Backend { status, message }
}

fn transport(error: reqwest::Error) -> LetterheadError {
    LetterheadError::Transport(error.to_string())
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn resolve_folder(&self, name: &str) -> Result<String> {
        debug!("resolving folder '{name}'");
        let response = self
            .client
            .post(self.url("folders:resolve"))
            .bearer_auth(&self.api_token)
            .json(&ResolveFolderRequest { name })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let text = response.text().await.map_err(transport)?;
        let body: ResolveFolderResponse = serde_json::from_str(&text)?;
        Ok(body.folder_id)
    }

    async fn create_document(
        &self,
        title: &str,
        html: &str,
        folder_id: Option<&str>,
    ) -> Result<String> {
        debug!("creating document '{title}'");
        let response = self
            .client
            .post(self.url("documents"))
            .bearer_auth(&self.api_token)
            .json(&CreateDocumentRequest {
                title,
                html,
                folder_id,
            })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let text = response.text().await.map_err(transport)?;
        let body: CreateDocumentResponse = serde_json::from_str(&text)?;
        Ok(body.document_id)
    }

    async fn get_document(&self, document_id: &str) -> Result<Snapshot> {
        let response = self
            .client
            .get(self.url(&format!("documents/{document_id}")))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let text = response.text().await.map_err(transport)?;
        let snapshot: Snapshot = serde_json::from_str(&text)?;
        Ok(snapshot)
    }

    async fn batch_update(&self, document_id: &str, batch: &MutationBatch) -> Result<()> {
        debug!("{document_id}: applying batch of {} mutation(s)", batch.len());
        let requests = batch.mutations().iter().map(wire::encode_mutation).collect();
        let response = self
            .client
            .post(self.url(&format!("documents/{document_id}:batchUpdate")))
            .bearer_auth(&self.api_token)
            .json(&BatchUpdateRequest { requests })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}
