//! Vector store abstraction for the ingestion pipeline.
//!
//! The store is an external collaborator addressed by a URL and a fixed
//! collection name. Implementations must distinguish payload-size rejections
//! (recoverable by splitting the batch) from other failures.

mod memory;
mod qdrant;

pub use memory::MemoryVectorStore;
pub use qdrant::QdrantVectorStore;

use crate::error::Result;
use crate::loader::OutputRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A record paired with its embedding, ready to write to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Store-side point id.
    pub id: Uuid,
    /// The record content, embedded and also kept in the payload.
    pub content: String,
    /// Record metadata, written as the point payload.
    pub metadata: Map<String, Value>,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl StoredDocument {
    /// Pair an output record with its embedding.
    pub fn from_record(record: OutputRecord, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: record.content,
            metadata: record.metadata,
            embedding,
        }
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self, dimensions: usize) -> Result<()>;

    /// Bulk upsert documents. Fails with [`crate::SporError::PayloadTooLarge`]
    /// when the store rejects the batch for its size.
    async fn upsert_batch(&self, docs: &[StoredDocument]) -> Result<usize>;

    /// Total number of stored documents.
    async fn document_count(&self) -> Result<usize>;
}
