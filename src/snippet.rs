use std::sync::LazyLock;

use regex::Regex;

/// Default maximum snippet length in characters
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

const ELLIPSIS: &str = "...";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Builds a plain-text preview of HTML content.
///
/// Tags are stripped, whitespace runs collapse to a single space and the
/// result is bounded to `max_length` characters. Text that has to be cut is
/// shortened to `max_length - 3` characters followed by `...`. When
/// `max_length` is shorter than the ellipsis itself the text is cut to
/// `max_length` characters without one.
///
/// ```
/// use feed_page::snippet::make_snippet;
///
/// assert_eq!(make_snippet("<p>Hello <b>world</b></p>", 200), "Hello world");
/// assert_eq!(make_snippet("Hello world", 8), "Hello...");
/// assert_eq!(make_snippet("Hello world", 2), "He");
/// ```
pub fn make_snippet(html: &str, max_length: usize) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = TAG.replace_all(html, "");
    // Unterminated tags leave stray brackets behind
    let text = text.replace(['<', '>'], "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    if max_length < ellipsis_len {
        return text.chars().take(max_length).collect();
    }

    let mut snippet: String = text.chars().take(max_length - ellipsis_len).collect();
    snippet.push_str(ELLIPSIS);
    snippet
}
