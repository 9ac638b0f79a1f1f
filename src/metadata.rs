//! Path metadata extraction.
//!
//! Derives technology/lesson/course identity from a transcript file's path
//! and name. Both the course markers and the lesson-name patterns are
//! explicit ordered rule lists evaluated in priority order, first match
//! wins, so rule order stays auditable and testable in isolation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Directory-name keywords that locate the course root, in priority order.
///
/// Marker priority beats component position: each marker is scanned across
/// all path components before the next marker is tried, so a higher-priority
/// marker appearing later in the path wins over a lower-priority marker
/// appearing earlier.
const COURSE_MARKERS: [&str; 4] = ["genai-cohort", "course", "lessons", "videos"];

/// Derived identity for a source file. Computed once per file, immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMetadata {
    pub file_name: String,
    pub file_name_without_ext: String,
    /// First path component after the course marker; empty if unmatched.
    pub technology: String,
    /// Path relative to the course root, or the full original path if no
    /// marker was found.
    pub path_after_course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    /// Two-digit zero-padded lesson number, if the filename matched a rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_topic: Option<String>,
}

/// Extractor holding the compiled lesson-name rules.
#[derive(Debug)]
pub struct PathMetadataExtractor {
    lesson_rules: Vec<Regex>,
}

impl PathMetadataExtractor {
    pub fn new() -> Self {
        // Ordered by priority; the first matching rule wins.
        let lesson_rules = vec![
            // "01-introduction", "01_introduction", "01 introduction"
            Regex::new(r"^(\d+)[-_\s]+(.+)").expect("Invalid regex"),
            // "lesson-01-introduction"
            Regex::new(r"(?i)^lesson[-_\s]*(\d+)[-_\s]*(.+)").expect("Invalid regex"),
            // "01.introduction"
            Regex::new(r"^(\d+)\.(.+)").expect("Invalid regex"),
            // "chapter-01-introduction"
            Regex::new(r"(?i)^chapter[-_\s]*(\d+)[-_\s]*(.+)").expect("Invalid regex"),
        ];
        Self { lesson_rules }
    }

    /// Extract metadata from a file path.
    pub fn extract(&self, file_path: &str) -> PathMetadata {
        let normalized = file_path.replace('\\', "/");
        let parts: Vec<&str> = normalized
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect();

        let file_name = parts.last().copied().unwrap_or_default().to_string();
        let file_name_without_ext = Path::new(&file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut technology = String::new();
        let mut path_after_course = String::new();
        let mut course_marker = None;
        let mut course_path = None;
        let mut relative_path = None;

        if let Some((marker, index)) = find_course_marker(&parts) {
            // A marker with nothing after it leaves the course fields unset.
            if index + 1 < parts.len() {
                let relevant = &parts[index + 1..];
                path_after_course = relevant.join("/");
                technology = relevant[0].to_string();
                course_marker = Some(marker.to_string());
                course_path = Some(parts[..=index].join("/"));
                relative_path = Some(path_after_course.clone());
            }
        }

        let (lesson_number, lesson_topic) = self.match_lesson_rules(&file_name_without_ext);

        PathMetadata {
            file_name,
            file_name_without_ext,
            technology,
            path_after_course: if path_after_course.is_empty() {
                file_path.to_string()
            } else {
                path_after_course
            },
            course_marker,
            course_path,
            relative_path,
            lesson_number,
            lesson_topic,
        }
    }

    /// Run the lesson-name rules in priority order against a bare filename.
    fn match_lesson_rules(&self, name: &str) -> (Option<String>, Option<String>) {
        for rule in &self.lesson_rules {
            if let Some(caps) = rule.captures(name) {
                let number = format!("{:0>2}", &caps[1]);
                let topic = caps[2].replace(['-', '_'], " ").trim().to_string();
                return (Some(number), Some(topic));
            }
        }
        (None, None)
    }
}

impl Default for PathMetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the course marker and its component index. Scans all components for
/// each marker before trying the next marker.
fn find_course_marker(parts: &[&str]) -> Option<(&'static str, usize)> {
    for marker in COURSE_MARKERS {
        if let Some(index) = parts
            .iter()
            .position(|part| part.to_lowercase().contains(marker))
        {
            return Some((marker, index));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_path_extraction() {
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract("genai-cohort/nodejs/01-introduction.vtt");

        assert_eq!(meta.technology, "nodejs");
        assert_eq!(meta.path_after_course, "nodejs/01-introduction.vtt");
        assert_eq!(meta.course_marker.as_deref(), Some("genai-cohort"));
        assert_eq!(meta.course_path.as_deref(), Some("genai-cohort"));
        assert_eq!(meta.lesson_number.as_deref(), Some("01"));
        assert_eq!(meta.lesson_topic.as_deref(), Some("introduction"));
    }

    #[test]
    fn test_no_marker_falls_back_to_original_path() {
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract("/some/random/dir/file.vtt");

        assert_eq!(meta.path_after_course, "/some/random/dir/file.vtt");
        assert_eq!(meta.technology, "");
        assert!(meta.course_marker.is_none());
        assert!(meta.course_path.is_none());
    }

    #[test]
    fn test_marker_priority_beats_position() {
        // "videos" appears earlier but "course" has higher rule priority.
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract("videos/archive/course-materials/python/02-loops.vtt");

        assert_eq!(meta.course_marker.as_deref(), Some("course"));
        assert_eq!(meta.technology, "python");
        assert_eq!(meta.path_after_course, "python/02-loops.vtt");
    }

    #[test]
    fn test_marker_match_is_substring_and_case_insensitive() {
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract("My-Videos/rust/03-ownership.vtt");

        assert_eq!(meta.course_marker.as_deref(), Some("videos"));
        assert_eq!(meta.technology, "rust");
    }

    #[test]
    fn test_trailing_marker_leaves_course_unset() {
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract("archive/lessons");

        assert!(meta.course_marker.is_none());
        assert_eq!(meta.path_after_course, "archive/lessons");
    }

    #[test]
    fn test_lesson_rule_variants() {
        let extractor = PathMetadataExtractor::new();

        let cases = [
            ("01-introduction.vtt", "01", "introduction"),
            ("1_getting_started.vtt", "01", "getting started"),
            ("lesson-07-streams.vtt", "07", "streams"),
            ("03.closures.vtt", "03", "closures"),
            ("chapter_2_http-servers.vtt", "02", "http servers"),
        ];

        for (name, number, topic) in cases {
            let meta = extractor.extract(name);
            assert_eq!(meta.lesson_number.as_deref(), Some(number), "{}", name);
            assert_eq!(meta.lesson_topic.as_deref(), Some(topic), "{}", name);
        }
    }

    #[test]
    fn test_unmatched_filename_leaves_lesson_unset() {
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract("introduction.vtt");

        assert!(meta.lesson_number.is_none());
        assert!(meta.lesson_topic.is_none());
        assert_eq!(meta.file_name_without_ext, "introduction");
    }

    #[test]
    fn test_windows_separators() {
        let extractor = PathMetadataExtractor::new();
        let meta = extractor.extract(r"genai-cohort\docker\05-volumes.vtt");

        assert_eq!(meta.technology, "docker");
        assert_eq!(meta.file_name, "05-volumes.vtt");
    }
}
