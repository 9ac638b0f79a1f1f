//! WebVTT parsing: timestamps, text sanitization, cue blocks and chunking.
//!
//! Everything in this module is a pure, synchronous transform over in-memory
//! strings and sequences. File I/O and per-file orchestration live in the
//! `loader` module.

mod combine;
mod parser;
mod sanitize;
mod timestamp;

pub use combine::combine_segments;
pub use parser::{BlockParser, ParseOptions};
pub use sanitize::TextSanitizer;
pub use timestamp::{format_timestamp, parse_timestamp};

use serde::{Deserialize, Serialize};

/// One parsed subtitle cue, or several cues merged by the combiner.
///
/// Segments are immutable once created: the combiner produces new merged
/// segments (retaining the originals as children) and the loader only reads
/// from them when building output records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Original cue id, a synthesized `segment_<n>`, or `combined_<n>`.
    pub id: String,
    /// Canonical start timestamp (`HH:MM:SS.mmm`).
    pub start_time: String,
    /// Canonical end timestamp (`HH:MM:SS.mmm`).
    pub end_time: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Sanitized, whitespace-normalized text.
    pub text: String,
    /// Raw text before sanitization (newline-joined when combined).
    pub original_text: String,
    /// Raw WebVTT cue-settings string, if the timeline carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue_settings: Option<String>,
    /// Always `end_seconds - start_seconds`, > 0.
    pub duration: f64,
    /// Number of source segments merged. Present only on combiner output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_count: Option<usize>,
    /// Ordered ids of the merged source segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_ids: Option<Vec<String>>,
    /// The pre-merge segments, in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_segments: Option<Vec<Segment>>,
}

impl Segment {
    /// Whether this segment was produced by the combiner.
    pub fn is_combined(&self) -> bool {
        self.segment_count.is_some()
    }
}
