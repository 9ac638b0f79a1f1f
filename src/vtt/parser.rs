//! Cue block parsing.
//!
//! Splits raw WebVTT content into cue blocks and parses each into a
//! [`Segment`]. Malformed blocks are either skipped and counted or abort the
//! whole parse, depending on [`ParseOptions::skip_malformed_segments`].

use super::sanitize::TextSanitizer;
use super::timestamp::parse_timestamp;
use super::Segment;
use crate::error::{Result, SporError};
use regex::Regex;
use tracing::debug;

/// Options controlling cue parsing and sanitization.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Strip HTML tags from cue text.
    pub remove_html_tags: bool,
    /// Strip WebVTT voice/class/timestamp cues from cue text.
    pub remove_position_cues: bool,
    /// Emit segments whose sanitized text is empty.
    pub include_empty_segments: bool,
    /// Skip malformed blocks instead of failing the whole parse.
    pub skip_malformed_segments: bool,
    /// Stop after this many valid segments (0 = unlimited).
    pub max_segments: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            remove_html_tags: true,
            remove_position_cues: true,
            include_empty_segments: false,
            skip_malformed_segments: true,
            max_segments: 0,
        }
    }
}

/// Stateless parser over raw VTT content.
#[derive(Debug)]
pub struct BlockParser {
    options: ParseOptions,
    sanitizer: TextSanitizer,
    blank_line: Regex,
    timeline: Regex,
}

impl BlockParser {
    pub fn new(options: ParseOptions) -> Self {
        let sanitizer =
            TextSanitizer::new(options.remove_html_tags, options.remove_position_cues);
        Self {
            options,
            sanitizer,
            blank_line: Regex::new(r"\n\s*\n").expect("Invalid regex"),
            // <start> --> <end> [cue-settings]
            timeline: Regex::new(
                r"^(\d{1,2}:\d{2}:\d{2}(?:[.,]\d{1,3})?)\s*-->\s*(\d{1,2}:\d{2}:\d{2}(?:[.,]\d{1,3})?)(?:\s+(.*))?$",
            )
            .expect("Invalid regex"),
        }
    }

    /// Parse raw VTT content into segments, in block order.
    pub fn parse(&self, content: &str) -> Result<Vec<Segment>> {
        // Strip a leading BOM and normalize line endings.
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

        let mut segments = Vec::new();
        let mut skipped = 0usize;

        'blocks: for (block_index, raw_block) in self.blank_line.split(&normalized).enumerate() {
            let block = raw_block.trim();

            if block.is_empty() || block.starts_with("WEBVTT") || block.starts_with("NOTE") {
                continue;
            }

            match self.parse_block(block, block_index) {
                Ok(Some(segment)) => {
                    segments.push(segment);
                    if self.options.max_segments > 0
                        && segments.len() >= self.options.max_segments
                    {
                        debug!("reached maximum segments limit: {}", self.options.max_segments);
                        break 'blocks;
                    }
                }
                // An empty segment; silently skipped, not an error.
                Ok(None) => {}
                Err(e) => {
                    if self.options.skip_malformed_segments {
                        skipped += 1;
                        debug!("skipped malformed segment {}: {}", block_index, e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        debug!(
            "parsed {} segments, skipped {} malformed segments",
            segments.len(),
            skipped
        );
        Ok(segments)
    }

    /// Parse a single cue block. Returns `Ok(None)` for an empty segment
    /// when empty segments are excluded.
    fn parse_block(&self, block: &str, block_index: usize) -> Result<Option<Segment>> {
        let malformed = |message: String| SporError::Parse {
            block: block_index,
            message,
        };

        let lines: Vec<&str> = block.split('\n').collect();
        let timeline_index = lines
            .iter()
            .position(|line| line.contains(" --> "))
            .ok_or_else(|| malformed("no timeline found in block".to_string()))?;

        // A line before the timeline is the cue id.
        let cue_id = if timeline_index > 0 {
            lines[0].trim().to_string()
        } else {
            String::new()
        };

        let timeline = lines[timeline_index].trim();
        let caps = self
            .timeline
            .captures(timeline)
            .ok_or_else(|| malformed(format!("invalid timeline format: {}", timeline)))?;

        let start_time = caps[1].to_string();
        let end_time = caps[2].to_string();
        let cue_settings = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());

        let raw_text = lines[timeline_index + 1..].join("\n").trim().to_string();
        let text = self.sanitizer.clean(&raw_text);

        if text.is_empty() && !self.options.include_empty_segments {
            return Ok(None);
        }

        let start_seconds = parse_timestamp(&start_time)
            .map_err(|e| malformed(format!("timestamp parsing failed: {}", e)))?;
        let end_seconds = parse_timestamp(&end_time)
            .map_err(|e| malformed(format!("timestamp parsing failed: {}", e)))?;

        if end_seconds <= start_seconds {
            return Err(malformed(format!(
                "end time must be after start time: {} --> {}",
                start_time, end_time
            )));
        }

        Ok(Some(Segment {
            id: if cue_id.is_empty() {
                format!("segment_{}", block_index + 1)
            } else {
                cue_id
            },
            start_time,
            end_time,
            start_seconds,
            end_seconds,
            text,
            original_text: raw_text,
            cue_settings,
            duration: end_seconds - start_seconds,
            segment_count: None,
            segment_ids: None,
            original_segments: None,
        }))
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\nHello <c.yellow>world</c>\n\n2\n00:00:02.000 --> 00:00:04.000\nSecond line\n";

    #[test]
    fn test_parses_sample_content() {
        let parser = BlockParser::default();
        let segments = parser.parse(SAMPLE).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].id, "1");
        assert_eq!(segments[0].text, "Hello world");
        assert_eq!(segments[0].original_text, "Hello <c.yellow>world</c>");
        assert_eq!(segments[1].start_seconds, 2.0);
        assert_eq!(segments[1].duration, 2.0);
    }

    #[test]
    fn test_synthesizes_segment_ids() {
        let parser = BlockParser::default();
        let content = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nNo cue id here\n";
        let segments = parser.parse(content).unwrap();

        assert_eq!(segments.len(), 1);
        // Block 0 is the WEBVTT header, so the cue is block 1.
        assert_eq!(segments[0].id, "segment_2");
    }

    #[test]
    fn test_handles_bom_and_crlf() {
        let parser = BlockParser::default();
        let content = "\u{feff}WEBVTT\r\n\r\n1\r\n00:00:00.000 --> 00:00:01.000\r\nWindows line endings\r\n";
        let segments = parser.parse(content).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Windows line endings");
    }

    #[test]
    fn test_skips_note_blocks() {
        let parser = BlockParser::default();
        let content = "WEBVTT\n\nNOTE this is a comment\n\n00:00:00.000 --> 00:00:01.000\nActual cue\n";
        let segments = parser.parse(content).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Actual cue");
    }

    #[test]
    fn test_captures_cue_settings() {
        let parser = BlockParser::default();
        let content = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000 align:start position:0%\nPositioned\n";
        let segments = parser.parse(content).unwrap();

        assert_eq!(
            segments[0].cue_settings.as_deref(),
            Some("align:start position:0%")
        );
    }

    #[test]
    fn test_multiline_text_joined_with_newlines() {
        let parser = BlockParser::default();
        let content = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nline one\nline two\n";
        let segments = parser.parse(content).unwrap();

        assert_eq!(segments[0].original_text, "line one\nline two");
        assert_eq!(segments[0].text, "line one line two");
    }

    #[test]
    fn test_inverted_interval_skipped_by_default() {
        let parser = BlockParser::default();
        let content = "WEBVTT\n\n1\n00:00:05.000 --> 00:00:02.000\nBackwards\n\n2\n00:00:05.000 --> 00:00:06.000\nValid\n";
        let segments = parser.parse(content).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, "2");
    }

    #[test]
    fn test_inverted_interval_fails_when_strict() {
        let parser = BlockParser::new(ParseOptions {
            skip_malformed_segments: false,
            ..ParseOptions::default()
        });
        let content = "WEBVTT\n\n1\n00:00:05.000 --> 00:00:02.000\nBackwards\n";
        let err = parser.parse(content).unwrap_err();

        match err {
            SporError::Parse { block, .. } => assert_eq!(block, 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_timeline_fails_when_strict() {
        let parser = BlockParser::new(ParseOptions {
            skip_malformed_segments: false,
            ..ParseOptions::default()
        });
        let content = "WEBVTT\n\n1\nnot a timeline\nSome text\n";
        assert!(parser.parse(content).is_err());
    }

    #[test]
    fn test_empty_segments_excluded_by_default() {
        let content = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.000\n<c.styled></c>\n";

        let parser = BlockParser::default();
        assert!(parser.parse(content).unwrap().is_empty());

        let inclusive = BlockParser::new(ParseOptions {
            include_empty_segments: true,
            ..ParseOptions::default()
        });
        let segments = inclusive.parse(content).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "");
    }

    #[test]
    fn test_max_segments_stops_early() {
        let parser = BlockParser::new(ParseOptions {
            max_segments: 1,
            ..ParseOptions::default()
        });
        let segments = parser.parse(SAMPLE).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, "1");
    }
}
