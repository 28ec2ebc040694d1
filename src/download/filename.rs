//! Output file naming.

use std::sync::LazyLock;

use regex::Regex;

use super::constants::{FALLBACK_TITLE, MAX_TITLE_LEN};

#[allow(clippy::expect_used)]
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("disallowed-char regex is valid"));

#[allow(clippy::expect_used)]
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("separator regex is valid"));

/// Reduces a title to word characters joined by single underscores.
///
/// Characters other than word characters, whitespace and hyphens are removed,
/// separator runs collapse to one `_`, and the result is cut to
/// [`MAX_TITLE_LEN`] characters. Leading and trailing underscores are
/// dropped, both before and after the cut. Applying it twice gives the same
/// result.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let stripped = DISALLOWED.replace_all(title, "");
    let joined = SEPARATOR_RUN.replace_all(&stripped, "_");
    let cut: String = joined.trim_matches('_').chars().take(MAX_TITLE_LEN).collect();
    cut.trim_end_matches('_').to_string()
}

/// Builds `<sanitized-title>_<video_id>.<extension>`.
#[must_use]
pub fn output_filename(title: &str, video_id: &str, extension: &str) -> String {
    let sanitized = sanitize_title(title);
    let stem = if sanitized.is_empty() {
        FALLBACK_TITLE
    } else {
        sanitized.as_str()
    };
    format!("{stem}_{video_id}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            sanitize_title("Rick Astley - Never Gonna Give You Up (Official Video)!!"),
            "Rick_Astley_Never_Gonna_Give_You_Up_Official_Video"
        );
    }

    #[test]
    fn test_sanitize_result_has_only_word_chars_and_single_underscores() {
        let name = sanitize_title("  Hello,   world --  what's _ up?  ");
        assert!(name.chars().all(|c| c.is_alphanumeric() || c == '_'), "{name}");
        assert!(!name.contains("__"), "{name}");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for title in [
            "A  title -- with: (lots) of / punctuation",
            "Ünïcödé títle: ok",
            "already_clean",
            "",
        ] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once, "not idempotent for {title:?}");
        }
    }

    #[test]
    fn test_sanitize_truncates_to_limit() {
        let long = "words ".repeat(60);
        let name = sanitize_title(&long);
        assert_eq!(name.chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn test_sanitize_trims_edge_underscores() {
        assert_eq!(sanitize_title("Hello world !"), "Hello_world");
        assert_eq!(sanitize_title("  -- Intro --  "), "Intro");
        assert_eq!(sanitize_title("_private_"), "private");
    }

    #[test]
    fn test_sanitize_cut_never_ends_on_underscore() {
        // "word_" repeats, so the cut lands right after a separator.
        let name = sanitize_title(&"word ".repeat(60));
        assert!(!name.ends_with('_'), "{name}");
        assert_eq!(name.chars().count(), MAX_TITLE_LEN - 1);
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_title("Café del Mar"), "Café_del_Mar");
    }

    #[test]
    fn test_output_filename_appends_id_and_extension() {
        assert_eq!(
            output_filename("My Clip!", "dQw4w9WgXcQ", "mp4"),
            "My_Clip_dQw4w9WgXcQ.mp4"
        );
        assert_eq!(
            output_filename("Song", "dQw4w9WgXcQ", "mp3"),
            "Song_dQw4w9WgXcQ.mp3"
        );
    }

    #[test]
    fn test_output_filename_has_no_doubled_separator() {
        let name = output_filename("Hello world !", "dQw4w9WgXcQ", "mp4");
        assert_eq!(name, "Hello_world_dQw4w9WgXcQ.mp4");
        assert!(!name.contains("__"), "{name}");
    }

    #[test]
    fn test_output_filename_falls_back_when_title_empty() {
        assert_eq!(output_filename("!!!", "dQw4w9WgXcQ", "mp4"), "video_dQw4w9WgXcQ.mp4");
    }
}
