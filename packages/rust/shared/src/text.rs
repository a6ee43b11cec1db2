//! Small text helpers shared by the feeds, core, and render crates.

/// Ellipsis marker appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Cap for summaries built from title, body, and comments.
pub const CONTEXT_SUMMARY_MAX_CHARS: usize = 420;

/// Cap for summaries built from a title alone (media posts).
pub const TITLE_SUMMARY_MAX_CHARS: usize = 200;

/// Truncate `text` to at most `max_chars` characters, marker included.
///
/// Text that already fits is returned unchanged. Otherwise the first
/// `max_chars - 1` characters are kept, trailing whitespace is dropped, and
/// [`ELLIPSIS`] is appended. Counting is by `char`, so multi-byte text is never
/// split mid-codepoint.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let kept: String = text.chars().take(max_chars - 1).collect();
    let mut out = kept.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn long_text_gets_marker_within_cap() {
        let text = "a".repeat(500);
        let out = truncate_with_ellipsis(&text, CONTEXT_SUMMARY_MAX_CHARS);
        assert_eq!(out.chars().count(), CONTEXT_SUMMARY_MAX_CHARS);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn trailing_space_is_dropped_before_marker() {
        let out = truncate_with_ellipsis("hello world again", 7);
        assert_eq!(out, "hello…");
    }

    #[test]
    fn multibyte_text_is_counted_by_char() {
        let text = "é".repeat(300);
        let out = truncate_with_ellipsis(&text, TITLE_SUMMARY_MAX_CHARS);
        assert_eq!(out.chars().count(), TITLE_SUMMARY_MAX_CHARS);
    }

    #[test]
    fn zero_cap_yields_empty() {
        assert_eq!(truncate_with_ellipsis("anything", 0), "");
    }

    #[test]
    fn collapse_whitespace_joins_runs() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
