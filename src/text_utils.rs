use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r#"(\d{4})-(\d{0,2})-(\d{0,2}) (\d{0,2}):(\d{0,2}):(\d{0,2})(\.\d{0,3})?"#
        ).unwrap();
    }

    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    // We are using the regex approach to make it more flexible
    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = to_u32(caps.index(6))?;

    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Err(format!("Invalid date in {}", buf));
    };
    let Some(time) = NaiveTime::from_hms_opt(h, mn, s) else {
        return Err(format!("Invalid time in {}", buf));
    };

    Ok(NaiveDateTime::new(date, time))
}

/// Turns a tag or category name into the identifier used in filters and archive folders.
/// "Rust Tips" -> "rust-tips", "Café" -> "cafe"
pub fn slugify(name: &str) -> String {
    let ascii = unidecode::unidecode(name).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Cleans a single line of user input: no markup, no percent-encoded octets,
/// no control characters and no runs of whitespace.
pub fn sanitize_text_field(input: &str) -> String {
    lazy_static! {
        static ref SCRIPT_STYLE_REGEX: Regex = Regex::new(
            r"(?is)<(script|style)[^>]*?>.*?</(script|style)>"
        ).unwrap();
        static ref TAG_REGEX: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
        static ref OCTET_REGEX: Regex = Regex::new(r"%[a-fA-F0-9]{2}").unwrap();
        static ref SPACES_REGEX: Regex = Regex::new(r"\s+").unwrap();
    }

    let text = SCRIPT_STYLE_REGEX.replace_all(input, "");
    let text = TAG_REGEX.replace_all(&text, "");
    // A lonely '<' left after removing the tags can't start markup anymore
    let text = text.replace('<', "&lt;");
    let text = OCTET_REGEX.replace_all(&text, "");
    let text: String = text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let text = SPACES_REGEX.replace_all(&text, " ");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let expected = NaiveDate::from_ymd_opt(2017, 9, 10).unwrap().and_hms_opt(10, 42, 32).unwrap();
        assert_eq!(parse_date_time("2017-09-10 10:42:32.123").unwrap(), expected);
        assert_eq!(parse_date_time("2017-09-10 10:42:32").unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid_date_time() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2017-13-10 10:42:32").is_err());
        assert!(parse_date_time("2017-12-10 25:42:32").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("News"), "news");
        assert_eq!(slugify("Rust Tips"), "rust-tips");
        assert_eq!(slugify("  C++ & Rust!  "), "c-rust");
        assert_eq!(slugify("Café com leite"), "cafe-com-leite");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("snake_case"), "snake_case");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_sanitize_removes_markup() {
        assert_eq!(sanitize_text_field("<b>rust</b>"), "rust");
        assert_eq!(sanitize_text_field("news<script>alert('x')</script>"), "news");
        assert_eq!(sanitize_text_field("<style>p{}</style>backup"), "backup");
        assert_eq!(sanitize_text_field("a < b"), "a &lt; b");
    }

    #[test]
    fn test_sanitize_removes_control_and_spaces() {
        assert_eq!(sanitize_text_field("  my\tbackup\n file \r\n"), "my backup file");
        assert_eq!(sanitize_text_field("two   spaces"), "two spaces");
        assert_eq!(sanitize_text_field("\u{0007}bell"), "bell");
    }

    #[test]
    fn test_sanitize_removes_octets() {
        assert_eq!(sanitize_text_field("tag%00name"), "tagname");
        assert_eq!(sanitize_text_field("%3Cscript%3E"), "script");
    }

    #[test]
    fn test_sanitize_keeps_plain_text() {
        assert_eq!(sanitize_text_field("2024-01-31"), "2024-01-31");
        assert_eq!(sanitize_text_field(""), "");
    }
}
