//! Small HTML and URL helpers shared by the adapters

use chrono::{DateTime, Utc};

/// Strip HTML tags from text and collapse whitespace
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`, so
/// comparisons such as "Nasdaq < 15,000" survive.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag && chars.peek().is_some_and(|&n| opens_tag(n)) => in_tag = true,
            '>' if in_tag => {
                // Tags act as word boundaries
                result.push(' ');
                in_tag = false;
            }
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    decode_entities(&result)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn opens_tag(next: char) -> bool {
    next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')
}

/// Decode the handful of entities feeds actually use
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&#8217;", "'")
        .replace("&amp;", "&")
}

/// Extract date from URL patterns
pub fn extract_date_from_url(url: &str) -> Option<DateTime<Utc>> {
    // Pattern: /2025/12/09/ or /2025/12/9/
    let slash_pattern = regex::Regex::new(r"/(\d{4})/(\d{1,2})/(\d{1,2})/").ok()?;
    if let Some(caps) = slash_pattern.captures(url) {
        if let Some(date) = date_from_captures(&caps) {
            return Some(date);
        }
    }

    // Pattern: /2025-12-09/
    let dash_pattern = regex::Regex::new(r"[/-](\d{4})-(\d{2})-(\d{2})[/-]").ok()?;
    if let Some(caps) = dash_pattern.captures(url) {
        return date_from_captures(&caps);
    }

    None
}

fn date_from_captures(caps: &regex::Captures<'_>) -> Option<DateTime<Utc>> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    let date = chrono::NaiveDate::from_ymd_opt(year, month, day)?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(12, 0, 0)?,
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_strip_html() {
        let html = "<p>Hello <b>world</b>!</p>";
        assert_eq!(strip_html(html), "Hello world !");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("AT&amp;T &nbsp; beats"), "AT&T beats");
        assert_eq!(strip_html("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn test_strip_html_keeps_literal_angle_brackets() {
        assert_eq!(
            strip_html("Nasdaq < 15,000 as yields rise"),
            "Nasdaq < 15,000 as yields rise"
        );
        assert_eq!(strip_html("<p>Gold > $2,400</p>"), "Gold > $2,400");
    }

    #[test]
    fn test_extract_date_from_url() {
        let date = extract_date_from_url("https://example.com/2025/03/07/fed-cut/").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 3, 7));

        let date = extract_date_from_url("https://example.com/news/2024-11-30-rally/").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 11, 30));

        assert!(extract_date_from_url("https://example.com/markets").is_none());
    }
}
