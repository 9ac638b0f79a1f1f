//! Subtitle text sanitization.
//!
//! Strips markup and WebVTT styling cues from raw cue text, leaving plain
//! text suitable for embedding. Cleaning is idempotent: re-applying it to
//! already-clean text is a no-op.

use regex::Regex;

/// Sanitizer for raw subtitle text.
///
/// Holds the compiled patterns so a loader can clean many blocks without
/// recompiling them.
#[derive(Debug)]
pub struct TextSanitizer {
    remove_html_tags: bool,
    remove_position_cues: bool,
    html_tag: Regex,
    cue_span: Regex,
    cue_open: Regex,
    cue_timestamp: Regex,
    any_tag: Regex,
    whitespace: Regex,
}

impl TextSanitizer {
    pub fn new(remove_html_tags: bool, remove_position_cues: bool) -> Self {
        Self {
            remove_html_tags,
            remove_position_cues,
            // Any <...> tag, including an unterminated trailing "<tag"
            html_tag: Regex::new(r"</?[^>]+(>|$)").expect("Invalid regex"),
            // Voice/class spans like <v Speaker>text</v> or <c.className>text</c>
            cue_span: Regex::new(r"(?i)<[vc](?:\.[^>]*)?>.*?</[vc]>").expect("Invalid regex"),
            // Bare voice/class open tags
            cue_open: Regex::new(r"(?i)<[vc][^>]*>").expect("Invalid regex"),
            // Inline timestamp cues like <00:01:23.456>
            cue_timestamp: Regex::new(r"<\d{2}:\d{2}:\d{2}\.\d{3}>").expect("Invalid regex"),
            // Anything else in angle brackets
            any_tag: Regex::new(r"<[^>]*>").expect("Invalid regex"),
            whitespace: Regex::new(r"\s+").expect("Invalid regex"),
        }
    }

    /// Clean raw subtitle text.
    ///
    /// Removes markup per the configured flags, collapses whitespace runs to
    /// a single space, decodes the common HTML entities and trims the result.
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut cleaned = text.to_string();

        if self.remove_html_tags {
            cleaned = self.html_tag.replace_all(&cleaned, "").into_owned();
        }

        if self.remove_position_cues {
            cleaned = self.cue_span.replace_all(&cleaned, "").into_owned();
            cleaned = self.cue_open.replace_all(&cleaned, "").into_owned();
            cleaned = self.cue_timestamp.replace_all(&cleaned, "").into_owned();
            cleaned = self.any_tag.replace_all(&cleaned, "").into_owned();
        }

        self.whitespace
            .replace_all(&cleaned, " ")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .trim()
            .to_string()
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new(true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_class_cues() {
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.clean("Hello <c.yellow>world</c>"), "Hello world");
    }

    #[test]
    fn test_strips_voice_tags() {
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.clean("<v Speaker>Welcome back"), "Welcome back");
    }

    #[test]
    fn test_strips_inline_timestamp_cues() {
        let sanitizer = TextSanitizer::new(false, true);
        assert_eq!(sanitizer.clean("word<00:01:23.456> by word"), "word by word");
    }

    #[test]
    fn test_strips_unterminated_trailing_tag() {
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.clean("Hello <c.yell"), "Hello");
    }

    #[test]
    fn test_collapses_whitespace() {
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.clean("  one\ttwo\nthree\r\nfour  "), "one two three four");
    }

    #[test]
    fn test_decodes_entities() {
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.clean("a&nbsp;&amp;&nbsp;b &quot;c&quot;"), "a & b \"c\"");
    }

    #[test]
    fn test_disabled_flags_keep_markup() {
        let sanitizer = TextSanitizer::new(false, false);
        assert_eq!(sanitizer.clean("<b>bold</b>"), "<b>bold</b>");
    }

    #[test]
    fn test_idempotent() {
        let sanitizer = TextSanitizer::default();
        for raw in [
            "Hello <c.yellow>world</c>",
            "  plain   text  ",
            "<v Narrator>line one\nline two</v>",
            "a &amp; b",
        ] {
            let once = sanitizer.clean(raw);
            assert_eq!(sanitizer.clean(&once), once);
        }
    }
}
