//! Ingest command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::ingest::BatchIngestor;
use crate::vector_store::QdrantVectorStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the ingest command.
pub async fn run_ingest(dir: Option<&str>, no_recurse: bool, settings: Settings) -> Result<()> {
    let root = match dir {
        Some(d) => Settings::expand_path(d),
        None => settings.root_dir(),
    };
    let recursive = if no_recurse {
        false
    } else {
        settings.ingestion.recursive
    };

    Output::header("Ingesting subtitle files");
    Output::kv("Directory", &root.display().to_string());
    Output::kv("Collection", &settings.vector_store.collection);
    Output::kv("Embedding model", &settings.embedding.model);

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let store = Arc::new(QdrantVectorStore::new(
        &settings.vector_store.url,
        &settings.vector_store.collection,
    )?);

    let ingestor = BatchIngestor::new(
        embedder,
        store,
        settings.loader.to_options(),
        settings.ingestion.to_config(),
    );

    let spinner = Output::spinner("Ingesting...");
    let result = ingestor.ingest_directory(&root, recursive).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            Output::success(&format!(
                "Ingested {} records from {} files",
                report.records_ingested, report.files_discovered
            ));
            if !report.failures.is_empty() {
                Output::warning(&format!("{} files failed to load:", report.failures.len()));
                for failure in &report.failures {
                    Output::list_item(&format!("{}: {}", failure.path.display(), failure.error));
                }
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            Err(e.into())
        }
    }
}
