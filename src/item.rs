use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use url::Url;

use crate::snippet::make_snippet;

const NO_TITLE: &str = "No title";
const NO_LINK: &str = "#";
const NOT_AVAILABLE: &str = "N/A";

const DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M %p";
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// One entry as extracted from a parsed feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Publication date string; format depends on the source
    pub published: Option<String>,
    /// Item body, possibly HTML. Empty when the feed has none.
    pub content: String,
    pub feed_title: Option<String>,
}

impl RawFeedItem {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published.as_deref().and_then(parse_date)
    }
}

/// Display-ready view of a [`RawFeedItem`]. Every field holds text that can
/// be rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub title: String,
    /// Item URL; anything other than an http(s) URL becomes "#"
    pub link: String,
    pub feed_title: String,
    /// Formatted local time. A date that cannot be parsed is shown as
    /// written in the feed; a missing one as "N/A".
    pub published: String,
    pub snippet: String,
}

impl DisplayItem {
    pub fn from_raw(item: RawFeedItem, snippet_length: usize) -> Self {
        Self::from_raw_in(item, snippet_length, &Local)
    }

    /// Like [`DisplayItem::from_raw`] with dates shown in `tz`.
    pub fn from_raw_in<Tz: TimeZone>(item: RawFeedItem, snippet_length: usize, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            published: format_published(item.published.as_deref(), tz),
            snippet: make_snippet(&item.content, snippet_length),
            title: non_blank(item.title).unwrap_or_else(|| NO_TITLE.to_string()),
            link: non_blank(item.link)
                .filter(|link| is_web_url(link))
                .unwrap_or_else(|| NO_LINK.to_string()),
            feed_title: non_blank(item.feed_title).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_web_url(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Parses the date formats commonly found in feeds.
///
/// Accepts RFC 3339 (Atom), RFC 2822 (RSS) and bare `YYYY-MM-DD` dates with
/// an optional time. Values without an offset are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Unparseable dates are shown verbatim; missing ones as "N/A".
fn format_published<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    match parse_date(raw) {
        Some(dt) => dt.with_timezone(tz).format(DATE_DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike};

    fn utc(raw: &str) -> DateTime<Utc> {
        parse_date(raw).unwrap()
    }

    mod parse_date_tests {
        use super::*;

        #[test]
        fn test_rfc3339() {
            let dt = utc("2024-03-05T10:30:00+02:00");
            assert_eq!((dt.day(), dt.hour(), dt.minute()), (5, 8, 30));
        }

        #[test]
        fn test_rfc2822() {
            let dt = utc("Tue, 05 Mar 2024 10:30:00 GMT");
            assert_eq!((dt.month(), dt.day(), dt.hour()), (3, 5, 10));
        }

        #[test]
        fn test_date_only_is_utc_midnight() {
            let dt = utc("2024-01-01");
            assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        }

        #[test]
        fn test_naive_datetime() {
            assert_eq!(utc("2024-01-01 12:00:00").hour(), 12);
            assert_eq!(utc("2024-01-01T12:00:00").hour(), 12);
        }

        #[test]
        fn test_surrounding_whitespace() {
            assert!(parse_date("  2024-01-01\n").is_some());
        }

        #[test]
        fn test_garbage() {
            assert_eq!(parse_date(""), None);
            assert_eq!(parse_date("   "), None);
            assert_eq!(parse_date("bad"), None);
            assert_eq!(parse_date("2024-13-45"), None);
            assert_eq!(parse_date("yesterday at noon"), None);
        }
    }

    mod display_item_tests {
        use super::*;

        fn plus_one() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        #[test]
        fn test_missing_fields_use_fallbacks() {
            let item = DisplayItem::from_raw(RawFeedItem::default(), 200);

            assert_eq!(item.title, "No title");
            assert_eq!(item.link, "#");
            assert_eq!(item.feed_title, "N/A");
            assert_eq!(item.published, "N/A");
            assert_eq!(item.snippet, "");
        }

        #[test]
        fn test_blank_fields_use_fallbacks() {
            let raw = RawFeedItem {
                title: Some("   ".to_string()),
                link: Some(String::new()),
                published: Some(" ".to_string()),
                content: String::new(),
                feed_title: Some("\n".to_string()),
            };
            let item = DisplayItem::from_raw(raw, 200);

            assert_eq!(item.title, "No title");
            assert_eq!(item.link, "#");
            assert_eq!(item.feed_title, "N/A");
            assert_eq!(item.published, "N/A");
        }

        #[test]
        fn test_present_fields_are_kept() {
            let raw = RawFeedItem {
                title: Some("Release notes".to_string()),
                link: Some("https://example.com/post".to_string()),
                published: Some("2024-01-01T12:00:00Z".to_string()),
                content: "<p>Lots of <em>changes</em></p>".to_string(),
                feed_title: Some("Example Blog".to_string()),
            };
            let item = DisplayItem::from_raw_in(raw, 200, &plus_one());

            assert_eq!(item.title, "Release notes");
            assert_eq!(item.link, "https://example.com/post");
            assert_eq!(item.feed_title, "Example Blog");
            assert_eq!(item.published, "Jan 1, 2024 1:00 PM");
            assert_eq!(item.snippet, "Lots of changes");
        }

        #[test]
        fn test_snippet_length_is_applied() {
            let raw = RawFeedItem {
                content: "abcdefghijklmnop".to_string(),
                ..Default::default()
            };
            assert_eq!(DisplayItem::from_raw(raw, 10).snippet, "abcdefg...");
        }

        #[test]
        fn test_non_web_links_fall_back() {
            for link in [
                "javascript:alert(document.cookie)",
                "JavaScript:alert(1)",
                "data:text/html,<script>alert(1)</script>",
                "/relative/path",
            ] {
                let raw = RawFeedItem {
                    link: Some(link.to_string()),
                    ..Default::default()
                };
                assert_eq!(DisplayItem::from_raw(raw, 200).link, "#", "link {link}");
            }
        }

        #[test]
        fn test_web_links_are_kept() {
            for link in ["http://example.com/a", "HTTPS://Example.com/b?c=d"] {
                let raw = RawFeedItem {
                    link: Some(link.to_string()),
                    ..Default::default()
                };
                assert_eq!(DisplayItem::from_raw(raw, 200).link, link);
            }
        }

        #[test]
        fn test_unparseable_date_shown_verbatim() {
            let raw = RawFeedItem {
                published: Some("sometime in spring".to_string()),
                ..Default::default()
            };
            assert_eq!(DisplayItem::from_raw(raw, 200).published, "sometime in spring");
        }
    }

    #[test]
    fn test_published_at() {
        let item = RawFeedItem {
            published: Some("2023-06-01".to_string()),
            ..Default::default()
        };
        assert_eq!(item.published_at(), Some(utc("2023-06-01T00:00:00Z")));
        assert_eq!(RawFeedItem::default().published_at(), None);
    }
}
