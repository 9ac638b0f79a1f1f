//! Qdrant vector store over the REST API.

use super::{StoredDocument, VectorStore};
use crate::error::{Result, SporError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

/// Qdrant-backed vector store, addressed by URL and collection name.
pub struct QdrantVectorStore {
    client: reqwest::Client,
    base_url: Url,
    collection: String,
}

impl QdrantVectorStore {
    pub fn new(url: &str, collection: &str) -> Result<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| SporError::Config(format!("Invalid vector store URL {}: {}", url, e)))?;
        if collection.trim().is_empty() {
            return Err(SporError::Config(
                "vector store collection name must be non-empty".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            collection: collection.to_string(),
        })
    }

    fn endpoint(&self, suffix: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{}/collections/{}{}", base, self.collection, suffix)
    }

    async fn error_from_response(&self, response: reqwest::Response) -> SporError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        classify_store_error(status, &body)
    }
}

/// Map a failed store response to the error taxonomy. Payload-size
/// rejections get their own class so the ingestion driver can retry with
/// smaller batches.
fn classify_store_error(status: StatusCode, body: &str) -> SporError {
    if status == StatusCode::PAYLOAD_TOO_LARGE
        || body.contains("larger than allowed")
        || body.contains("Payload error")
    {
        SporError::PayloadTooLarge(format!("{}: {}", status, body))
    } else {
        SporError::VectorStore(format!("{}: {}", status, body))
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<()> {
        let exists = self.client.get(self.endpoint("")).send().await?;
        if exists.status().is_success() {
            debug!("collection {} already exists", self.collection);
            return Ok(());
        }

        let body = json!({
            "vectors": { "size": dimensions, "distance": "Cosine" }
        });
        let response = self
            .client
            .put(self.endpoint(""))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }
        info!("created collection {} ({} dims)", self.collection, dimensions);
        Ok(())
    }

    async fn upsert_batch(&self, docs: &[StoredDocument]) -> Result<usize> {
        if docs.is_empty() {
            return Ok(0);
        }

        let points: Vec<Value> = docs
            .iter()
            .map(|doc| {
                let mut payload = doc.metadata.clone();
                payload.insert("content".to_string(), json!(doc.content));
                json!({
                    "id": doc.id,
                    "vector": doc.embedding,
                    "payload": payload,
                })
            })
            .collect();

        let response = self
            .client
            .put(self.endpoint("/points?wait=true"))
            .json(&json!({ "points": points }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }
        debug!("upserted {} points into {}", docs.len(), self.collection);
        Ok(docs.len())
    }

    async fn document_count(&self) -> Result<usize> {
        let response = self
            .client
            .post(self.endpoint("/points/count"))
            .json(&json!({ "exact": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let body: Value = response.json().await?;
        Ok(body["result"]["count"].as_u64().unwrap_or(0) as usize)
    }
}
