//! VTT file loading and record construction.
//!
//! [`VttLoader`] orchestrates the per-file pipeline: validate configuration,
//! read the file, parse cue blocks, optionally combine segments, derive path
//! metadata and emit one [`OutputRecord`] per segment. It owns the per-file
//! error policy; cross-file policy lives in [`VttLoader::load_multiple`].

mod discover;

pub use discover::discover_files;

use crate::error::{Result, SporError};
use crate::metadata::{PathMetadata, PathMetadataExtractor};
use crate::vtt::{combine_segments, BlockParser, ParseOptions, Segment};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Default number of segments per combined chunk.
pub const DEFAULT_SEGMENTS_PER_CHUNK: usize = 3;
/// Files above this size are still processed but logged as large.
pub const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;
/// Files above this size are rejected before reading.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Supported subtitle extensions (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["vtt", "webvtt"];

/// Per-loader configuration. Validated once at construction.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Combine consecutive segments into larger chunks.
    pub combine_segments: bool,
    /// Segments per combined chunk (>= 1).
    pub segments_per_chunk: usize,
    /// Strip HTML tags from subtitle text.
    pub remove_html_tags: bool,
    /// Strip WebVTT positioning/styling cues.
    pub remove_position_cues: bool,
    /// Emit segments whose sanitized text is empty.
    pub include_empty_segments: bool,
    /// Extra metadata applied over the base fields of every record.
    ///
    /// Applied last, so caller-supplied keys can override core fields like
    /// `segmentId` or `startTime`. This is deliberate (override-for-
    /// enrichment) but means a careless caller can clobber the retrieval
    /// contract fields.
    pub custom_metadata: Map<String, Value>,
    /// Skip malformed blocks instead of failing the file.
    pub skip_malformed_segments: bool,
    /// Maximum segments to parse per file (0 = unlimited).
    pub max_segments: usize,
    /// Log per-file progress at info level instead of debug.
    pub verbose: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            combine_segments: false,
            segments_per_chunk: DEFAULT_SEGMENTS_PER_CHUNK,
            remove_html_tags: true,
            remove_position_cues: true,
            include_empty_segments: false,
            custom_metadata: Map::new(),
            skip_malformed_segments: true,
            max_segments: 0,
            verbose: false,
        }
    }
}

impl LoaderOptions {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            remove_html_tags: self.remove_html_tags,
            remove_position_cues: self.remove_position_cues,
            include_empty_segments: self.include_empty_segments,
            skip_malformed_segments: self.skip_malformed_segments,
            max_segments: self.max_segments,
        }
    }
}

/// Echo of the processing flags, attached to every record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOptions {
    pub combine_segments: bool,
    pub segments_per_chunk: usize,
    pub remove_html_tags: bool,
    pub remove_position_cues: bool,
}

/// Base metadata for one output record.
///
/// Serialized with camelCase names: the retrieval pipeline filters and
/// displays on `technology`, `lessonNumber`, `lessonTopic`, `startTime`,
/// `endTime` and `segmentId` exactly, so the wire names are a stable
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub source: String,
    pub file_name: String,
    pub technology: String,
    pub segment_id: String,
    pub start_time: String,
    pub end_time: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub duration: f64,
    pub index: usize,
    pub loaded_at: chrono::DateTime<Utc>,
    pub processing_options: ProcessingOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_segment_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_combined_segment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue_settings: Option<String>,
}

/// One content+metadata record, the unit written to the vector store.
/// Immutable after creation; consumers only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    pub content: String,
    pub metadata: Map<String, Value>,
}

/// A per-file failure collected by [`VttLoader::load_multiple`].
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: SporError,
}

/// Outcome of loading several files with `skip_errors` enabled.
#[derive(Debug, Default)]
pub struct MultiLoadResult {
    /// Records in file order, then within-file segment order.
    pub records: Vec<OutputRecord>,
    /// One entry per file that failed to load.
    pub failures: Vec<LoadFailure>,
}

/// Apply caller-supplied metadata over a base metadata map.
///
/// Later keys win: this is the explicit override step, kept separate so the
/// precedence is visible and testable.
pub fn apply_overrides(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        base.insert(key.clone(), value.clone());
    }
}

/// Loader for a single WebVTT file.
#[derive(Debug)]
pub struct VttLoader {
    file_path: PathBuf,
    options: LoaderOptions,
    parser: BlockParser,
    extractor: PathMetadataExtractor,
}

impl VttLoader {
    /// Create a loader, validating the path and options before any I/O.
    pub fn new(file_path: impl Into<PathBuf>, options: LoaderOptions) -> Result<Self> {
        let file_path = file_path.into();

        if file_path.as_os_str().is_empty() {
            return Err(SporError::InvalidInput(
                "file path must be non-empty".to_string(),
            ));
        }
        if !has_supported_extension(&file_path) {
            let ext = file_path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            return Err(SporError::UnsupportedExtension(ext));
        }
        if options.segments_per_chunk < 1 {
            return Err(SporError::Config(
                "segments_per_chunk must be at least 1".to_string(),
            ));
        }

        let parser = BlockParser::new(options.parse_options());
        Ok(Self {
            file_path,
            options,
            parser,
            extractor: PathMetadataExtractor::new(),
        })
    }

    /// Load the file and emit one record per (possibly combined) segment.
    ///
    /// Any failure aborts the whole file and is wrapped with the file path;
    /// no partial record list is ever returned.
    #[instrument(skip(self), fields(path = %self.file_path.display()))]
    pub async fn load(&self) -> Result<Vec<OutputRecord>> {
        self.load_inner().await.map_err(|e| match e {
            already @ SporError::Load { .. } => already,
            cause => SporError::Load {
                path: self.file_path.display().to_string(),
                message: cause.to_string(),
            },
        })
    }

    async fn load_inner(&self) -> Result<Vec<OutputRecord>> {
        self.check_file_size().await?;

        let content = tokio::fs::read_to_string(&self.file_path).await?;
        if content.trim().is_empty() {
            return Err(SporError::InvalidInput("VTT file is empty".to_string()));
        }

        let segments = self.parser.parse(&content)?;
        if segments.is_empty() {
            debug!("no valid segments found");
            return Ok(Vec::new());
        }

        let processed = if self.options.combine_segments {
            combine_segments(
                &segments,
                self.options.segments_per_chunk,
                self.options.include_empty_segments,
            )
        } else {
            segments
        };

        let path_metadata = self.extractor.extract(&self.file_path.to_string_lossy());

        let records: Vec<OutputRecord> = processed
            .iter()
            .enumerate()
            .map(|(index, segment)| self.build_record(segment, index, &path_metadata))
            .collect::<Result<_>>()?;

        if self.options.verbose {
            info!("loaded {} records", records.len());
        } else {
            debug!("loaded {} records", records.len());
        }
        Ok(records)
    }

    /// Build one output record: base fields first, then the caller's custom
    /// metadata applied over the top.
    fn build_record(
        &self,
        segment: &Segment,
        index: usize,
        path_metadata: &PathMetadata,
    ) -> Result<OutputRecord> {
        let base = RecordMetadata {
            source: path_metadata.path_after_course.clone(),
            file_name: path_metadata.file_name.clone(),
            technology: path_metadata.technology.clone(),
            segment_id: segment.id.clone(),
            start_time: segment.start_time.clone(),
            end_time: segment.end_time.clone(),
            start_seconds: segment.start_seconds,
            end_seconds: segment.end_seconds,
            duration: segment.duration,
            index,
            loaded_at: Utc::now(),
            processing_options: ProcessingOptions {
                combine_segments: self.options.combine_segments,
                segments_per_chunk: self.options.segments_per_chunk,
                remove_html_tags: self.options.remove_html_tags,
                remove_position_cues: self.options.remove_position_cues,
            },
            lesson_number: path_metadata.lesson_number.clone(),
            lesson_topic: path_metadata.lesson_topic.clone(),
            course_marker: path_metadata.course_marker.clone(),
            course_path: path_metadata.course_path.clone(),
            segment_count: segment.segment_count,
            original_segment_ids: segment.segment_ids.clone(),
            is_combined_segment: segment.is_combined().then_some(true),
            cue_settings: segment.cue_settings.clone(),
        };

        let Value::Object(mut metadata) = serde_json::to_value(&base)? else {
            return Err(SporError::Config(
                "record metadata must serialize to an object".to_string(),
            ));
        };
        apply_overrides(&mut metadata, &self.options.custom_metadata);

        Ok(OutputRecord {
            content: segment.text.clone(),
            metadata,
        })
    }

    /// Reject missing or oversized files before reading them.
    async fn check_file_size(&self) -> Result<()> {
        let meta = tokio::fs::metadata(&self.file_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SporError::FileNotFound(self.file_path.display().to_string())
            } else {
                SporError::Io(e)
            }
        })?;

        let size = meta.len();
        if size > MAX_FILE_SIZE {
            return Err(SporError::FileTooLarge {
                size,
                max: MAX_FILE_SIZE,
            });
        }
        if size > LARGE_FILE_THRESHOLD {
            warn!(
                "processing large file: {:.2} MB",
                size as f64 / 1024.0 / 1024.0
            );
        }
        Ok(())
    }

    /// Load several files sequentially with shared options.
    ///
    /// With `skip_errors`, a failing file is recorded in the result and the
    /// remaining files still load; otherwise the first failure aborts the
    /// whole call. Record order follows file order, then within-file segment
    /// order.
    pub async fn load_multiple(
        file_paths: &[PathBuf],
        options: &LoaderOptions,
        skip_errors: bool,
    ) -> Result<MultiLoadResult> {
        if file_paths.is_empty() {
            return Err(SporError::InvalidInput(
                "file_paths must be non-empty".to_string(),
            ));
        }

        let mut result = MultiLoadResult::default();

        for path in file_paths {
            let outcome = match VttLoader::new(path.clone(), options.clone()) {
                Ok(loader) => loader.load().await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(records) => result.records.extend(records),
                Err(error) => {
                    if !skip_errors {
                        return Err(error);
                    }
                    warn!("skipping {}: {}", path.display(), error);
                    result.failures.push(LoadFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        Ok(result)
    }
}

/// Whether a path carries one of the supported subtitle extensions.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
