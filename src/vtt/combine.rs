//! Segment combination.
//!
//! Re-windows an ordered segment sequence into fixed-size chunks for
//! retrieval granularity. Windows are strictly positional: segments are
//! never reordered and temporal adjacency is not checked, so callers must
//! ensure input order is the desired merge order.

use super::Segment;
use tracing::debug;

/// Merge consecutive segments into windows of `chunk_size` (the last window
/// may be shorter). A window whose combined text is empty is dropped unless
/// `include_empty_segments` is set.
pub fn combine_segments(
    segments: &[Segment],
    chunk_size: usize,
    include_empty_segments: bool,
) -> Vec<Segment> {
    if segments.is_empty() || chunk_size == 0 {
        return segments.to_vec();
    }

    let mut combined = Vec::with_capacity(segments.len().div_ceil(chunk_size));

    for (window_index, window) in segments.chunks(chunk_size).enumerate() {
        let first = &window[0];
        let last = &window[window.len() - 1];

        let text = window
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if text.is_empty() && !include_empty_segments {
            continue;
        }

        combined.push(Segment {
            id: format!("combined_{}", window_index + 1),
            start_time: first.start_time.clone(),
            end_time: last.end_time.clone(),
            start_seconds: first.start_seconds,
            end_seconds: last.end_seconds,
            text,
            original_text: window
                .iter()
                .map(|s| s.original_text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            cue_settings: None,
            duration: last.end_seconds - first.start_seconds,
            segment_count: Some(window.len()),
            segment_ids: Some(window.iter().map(|s| s.id.clone()).collect()),
            original_segments: Some(window.to_vec()),
        });
    }

    debug!(
        "combined {} segments into {} chunks",
        segments.len(),
        combined.len()
    );
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: &str, start: f64, end: f64, text: &str) -> Segment {
        Segment {
            id: id.to_string(),
            start_time: crate::vtt::format_timestamp(start).unwrap(),
            end_time: crate::vtt::format_timestamp(end).unwrap(),
            start_seconds: start,
            end_seconds: end,
            text: text.to_string(),
            original_text: text.to_string(),
            cue_settings: None,
            duration: end - start,
            segment_count: None,
            segment_ids: None,
            original_segments: None,
        }
    }

    fn five_segments() -> Vec<Segment> {
        (0..5)
            .map(|i| {
                segment(
                    &format!("{}", i + 1),
                    i as f64 * 2.0,
                    (i + 1) as f64 * 2.0,
                    &format!("text {}", i + 1),
                )
            })
            .collect()
    }

    #[test]
    fn test_windows_of_two() {
        let combined = combine_segments(&five_segments(), 2, false);

        assert_eq!(combined.len(), 3);
        let counts: Vec<usize> = combined.iter().map(|s| s.segment_count.unwrap()).collect();
        assert_eq!(counts, vec![2, 2, 1]);

        // Last chunk covers only the 5th source segment.
        assert_eq!(combined[2].segment_ids.as_ref().unwrap(), &vec!["5".to_string()]);
        assert_eq!(combined[2].start_seconds, 8.0);
        assert_eq!(combined[2].end_seconds, 10.0);
    }

    #[test]
    fn test_combined_fields() {
        let combined = combine_segments(&five_segments(), 3, false);

        assert_eq!(combined[0].id, "combined_1");
        assert_eq!(combined[0].text, "text 1 text 2 text 3");
        assert_eq!(combined[0].original_text, "text 1\ntext 2\ntext 3");
        assert_eq!(combined[0].start_time, "00:00:00.000");
        assert_eq!(combined[0].end_time, "00:00:06.000");
        assert_eq!(combined[0].duration, 6.0);
        assert_eq!(combined[0].original_segments.as_ref().unwrap().len(), 3);
        assert_eq!(combined[1].id, "combined_2");
    }

    #[test]
    fn test_empty_window_dropped() {
        let segments = vec![
            segment("1", 0.0, 1.0, "spoken"),
            segment("2", 1.0, 2.0, "words"),
            segment("3", 2.0, 3.0, ""),
            segment("4", 3.0, 4.0, ""),
        ];
        let combined = combine_segments(&segments, 2, false);

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].text, "spoken words");

        let inclusive = combine_segments(&segments, 2, true);
        assert_eq!(inclusive.len(), 2);
        assert_eq!(inclusive[1].text, "");
    }

    #[test]
    fn test_gaps_are_ignored() {
        // A temporal gap between windows never breaks a chunk boundary.
        let segments = vec![
            segment("1", 0.0, 1.0, "before splice"),
            segment("2", 500.0, 501.0, "after splice"),
        ];
        let combined = combine_segments(&segments, 2, false);

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].duration, 501.0);
    }

    #[test]
    fn test_empty_input_passes_through() {
        assert!(combine_segments(&[], 3, false).is_empty());
    }
}
