//! Configuration settings for Spor.

use crate::ingest::IngestionConfig;
use crate::loader::{LoaderOptions, DEFAULT_SEGMENTS_PER_CHUNK};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub loader: LoaderSettings,
    pub ingestion: IngestionSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// VTT loader settings, the per-file processing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Combine consecutive segments into larger chunks.
    pub combine_segments: bool,
    /// Segments per combined chunk.
    pub segments_per_chunk: usize,
    /// Strip HTML tags from subtitle text.
    pub remove_html_tags: bool,
    /// Strip WebVTT positioning/styling cues.
    pub remove_position_cues: bool,
    /// Emit segments whose sanitized text is empty.
    pub include_empty_segments: bool,
    /// Skip malformed cue blocks instead of failing the file.
    pub skip_malformed_segments: bool,
    /// Maximum segments per file (0 = unlimited).
    pub max_segments: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            combine_segments: true,
            segments_per_chunk: DEFAULT_SEGMENTS_PER_CHUNK,
            remove_html_tags: true,
            remove_position_cues: true,
            include_empty_segments: false,
            skip_malformed_segments: true,
            max_segments: 0,
        }
    }
}

impl LoaderSettings {
    /// Convert to loader options.
    pub fn to_options(&self) -> LoaderOptions {
        LoaderOptions {
            combine_segments: self.combine_segments,
            segments_per_chunk: self.segments_per_chunk,
            remove_html_tags: self.remove_html_tags,
            remove_position_cues: self.remove_position_cues,
            include_empty_segments: self.include_empty_segments,
            skip_malformed_segments: self.skip_malformed_segments,
            max_segments: self.max_segments,
            ..LoaderOptions::default()
        }
    }
}

/// Batch ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Root directory scanned for subtitle files.
    pub root_dir: String,
    /// Scan subdirectories.
    pub recursive: bool,
    /// Files loaded per batch.
    pub file_batch_size: usize,
    /// Documents written to the store per request.
    pub document_batch_size: usize,
    /// Batch size when retrying after a payload-size rejection.
    pub retry_batch_size: usize,
    /// Pause between file batches (ms).
    pub file_batch_delay_ms: u64,
    /// Pause between document batches (ms).
    pub document_batch_delay_ms: u64,
    /// Pause between retry batches (ms).
    pub retry_delay_ms: u64,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            root_dir: "./genai-cohort".to_string(),
            recursive: true,
            file_batch_size: 10,
            document_batch_size: 25,
            retry_batch_size: 10,
            file_batch_delay_ms: 2000,
            document_batch_delay_ms: 500,
            retry_delay_ms: 1000,
        }
    }
}

impl IngestionSettings {
    /// Convert to the driver's batch configuration.
    pub fn to_config(&self) -> IngestionConfig {
        IngestionConfig {
            file_batch_size: self.file_batch_size,
            document_batch_size: self.document_batch_size,
            retry_batch_size: self.retry_batch_size,
            file_batch_delay: Duration::from_millis(self.file_batch_delay_ms),
            document_batch_delay: Duration::from_millis(self.document_batch_delay_ms),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-large".to_string(),
            dimensions: 3072,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Qdrant endpoint URL.
    pub url: String,
    /// Collection name.
    pub collection: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            collection: "course-transcripts".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SporError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spor")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded ingestion root directory.
    pub fn root_dir(&self) -> PathBuf {
        Self::expand_path(&self.ingestion.root_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let settings = Settings::default();
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.loader.segments_per_chunk, DEFAULT_SEGMENTS_PER_CHUNK);
        assert_eq!(parsed.ingestion.document_batch_size, 25);
        assert_eq!(parsed.vector_store.collection, "course-transcripts");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str(
            "[loader]\nsegments_per_chunk = 4\n\n[vector_store]\nurl = \"http://qdrant:6333\"\n",
        )
        .unwrap();

        assert_eq!(parsed.loader.segments_per_chunk, 4);
        assert!(parsed.loader.combine_segments);
        assert_eq!(parsed.vector_store.url, "http://qdrant:6333");
        assert_eq!(parsed.embedding.model, "text-embedding-3-large");
    }

    #[test]
    fn test_loader_settings_to_options() {
        let settings = LoaderSettings {
            combine_segments: false,
            max_segments: 5,
            ..LoaderSettings::default()
        };
        let options = settings.to_options();

        assert!(!options.combine_segments);
        assert_eq!(options.max_segments, 5);
        assert!(options.custom_metadata.is_empty());
    }
}
