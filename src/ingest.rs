//! Batch ingestion driver.
//!
//! Discovers subtitle files, loads them through the VTT loader in bounded
//! file batches, embeds the resulting records and writes them to the vector
//! store in bounded document batches. The store enforces request-size and
//! rate limits, so batches are paced with inter-batch delays, and a batch
//! rejected as too large is split into smaller batches and resubmitted
//! rather than dropped.

use crate::embedding::Embedder;
use crate::error::{Result, SporError};
use crate::loader::{discover_files, LoadFailure, LoaderOptions, OutputRecord, VttLoader};
use crate::vector_store::{StoredDocument, VectorStore};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Batch sizes and pacing for the ingestion run.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Files loaded per batch.
    pub file_batch_size: usize,
    /// Documents written to the store per request.
    pub document_batch_size: usize,
    /// Batch size used when retrying after a payload-size rejection.
    pub retry_batch_size: usize,
    /// Pause between file batches.
    pub file_batch_delay: Duration,
    /// Pause between document batches.
    pub document_batch_delay: Duration,
    /// Pause between retry batches.
    pub retry_delay: Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            file_batch_size: 10,
            document_batch_size: 25,
            retry_batch_size: 10,
            file_batch_delay: Duration::from_millis(2000),
            document_batch_delay: Duration::from_millis(500),
            retry_delay: Duration::from_millis(1000),
        }
    }
}

/// Summary of a completed ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Subtitle files found under the root directory.
    pub files_discovered: usize,
    /// Files that failed to load and were skipped.
    pub failures: Vec<LoadFailure>,
    /// Records written to the store.
    pub records_ingested: usize,
}

/// Driver that feeds loader output into the vector store in batches.
pub struct BatchIngestor {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    loader_options: LoaderOptions,
    config: IngestionConfig,
}

impl BatchIngestor {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        loader_options: LoaderOptions,
        config: IngestionConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            loader_options,
            config,
        }
    }

    /// Ingest every subtitle file under `directory`.
    ///
    /// One bad file never aborts the run (files load with `skip_errors`);
    /// store errors other than payload-size rejections do.
    #[instrument(skip(self, directory), fields(dir = %directory.as_ref().display()))]
    pub async fn ingest_directory(
        &self,
        directory: impl AsRef<Path>,
        recursive: bool,
    ) -> Result<IngestReport> {
        let files = discover_files(directory, recursive).await?;
        info!("found {} subtitle files", files.len());

        let mut report = IngestReport {
            files_discovered: files.len(),
            ..IngestReport::default()
        };
        if files.is_empty() {
            return Ok(report);
        }

        self.store
            .ensure_collection(self.embedder.dimensions())
            .await?;

        let file_batches: Vec<_> = files.chunks(self.config.file_batch_size).collect();
        for (i, file_batch) in file_batches.iter().enumerate() {
            info!(
                "processing file batch {}/{} ({} files)",
                i + 1,
                file_batches.len(),
                file_batch.len()
            );

            let loaded =
                VttLoader::load_multiple(file_batch, &self.loader_options, true).await?;
            report.failures.extend(loaded.failures);

            if loaded.records.is_empty() {
                debug!("no records in this batch");
            } else {
                report.records_ingested += self.process_document_batches(&loaded.records).await?;
                info!("total ingested: {} records", report.records_ingested);
            }

            if i + 1 < file_batches.len() {
                sleep(self.config.file_batch_delay).await;
            }
        }

        info!(
            "ingestion complete: {} records from {} files ({} failed)",
            report.records_ingested,
            report.files_discovered,
            report.failures.len()
        );
        Ok(report)
    }

    /// Write records to the store in document batches, splitting any batch
    /// the store rejects for its size.
    async fn process_document_batches(&self, records: &[OutputRecord]) -> Result<usize> {
        let batches: Vec<_> = records.chunks(self.config.document_batch_size).collect();
        debug!("processing {} document batches", batches.len());

        let mut written = 0;
        for (j, batch) in batches.iter().enumerate() {
            match self.embed_and_upsert(batch).await {
                Ok(count) => written += count,
                Err(SporError::PayloadTooLarge(message)) => {
                    warn!(
                        "document batch {} rejected as too large, retrying split: {}",
                        j + 1,
                        message
                    );
                    written += self.retry_with_smaller_batches(batch).await?;
                }
                Err(e) => return Err(e),
            }

            if j + 1 < batches.len() {
                sleep(self.config.document_batch_delay).await;
            }
        }
        Ok(written)
    }

    /// Resubmit a rejected batch in smaller pieces. Documents are never
    /// silently dropped; a piece that still fails propagates its error.
    async fn retry_with_smaller_batches(&self, records: &[OutputRecord]) -> Result<usize> {
        let mut written = 0;
        for tiny_batch in records.chunks(self.config.retry_batch_size) {
            written += self.embed_and_upsert(tiny_batch).await?;
            sleep(self.config.retry_delay).await;
        }
        Ok(written)
    }

    async fn embed_and_upsert(&self, records: &[OutputRecord]) -> Result<usize> {
        let texts: Vec<String> = records.iter().map(|r| r.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let docs: Vec<StoredDocument> = records
            .iter()
            .cloned()
            .zip(embeddings)
            .map(|(record, embedding)| StoredDocument::from_record(record, embedding))
            .collect();

        self.store.upsert_batch(&docs).await
    }
}
