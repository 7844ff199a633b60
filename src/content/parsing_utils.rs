use std::{fs, io};
use std::io::ErrorKind;
use std::path::Path;
use std::str::Lines;

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;

use crate::content::{ContentHeader, PostId};
use crate::text_utils::parse_date_time;

pub fn parse_texted_header<'a>(file_name: &Path, lines: Lines<'a>) -> io::Result<(ContentHeader, Lines<'a>, Option<&'a str>)> {
    let mut id: String = "".to_string();
    let mut date: String = "".to_string();
    let mut author: String = "".to_string();
    let mut tags: String = "".to_string();
    let mut categories: String = "".to_string();

    let mut lines = lines.clone();
    let mut maybe_line = lines.next();

    // Skip optional HTML comment in the beginning
    let mut start_with_comment = false;

    while let Some(line) = maybe_line {
        let line = line.trim();

        // Empty lines are ok
        if line.is_empty() {
            maybe_line = lines.next();
            continue;
        }

        if line == "<!--" {
            maybe_line = lines.next();
            start_with_comment = true;
        }
        break;
    }

    while let Some(line) = maybe_line {
        if line.trim().is_empty() {
            maybe_line = lines.next();
            continue;
        }

        let (key, val) = match extract_texted_header(line) {
            None => break,
            Some((k, v)) => (k, v),
        };

        match key {
            "ID" => id = val.to_string(),
            "DATE" => date = val.to_string(),
            "AUTHOR" => author = val.to_string(),
            "TAGS" => tags = val.to_string(),
            "CATEGORY" | "CATEGORIES" => categories = val.to_string(),
            _ => {}
        }
        maybe_line = lines.next();
    }

    if start_with_comment {
        // Let's find the end of the comment
        loop {
            if let Some(line) = maybe_line {
                let line = line.trim();

                if line == "-->" {
                    maybe_line = lines.next();
                    break;
                }
            } else {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("End of comment in the header is missing - file={}", file_name.display()))
                );
            }

            maybe_line = lines.next();
        }
    }

    if id.is_empty() && date.is_empty() && author.is_empty() && tags.is_empty() {
        return Err(io::Error::new(ErrorKind::InvalidData, "Invalid texted header".to_string()));
    }

    let date = parse_date_time(&date).map_err(|e| {
        io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, file_name.display()))
    })?;

    let header = ContentHeader {
        file_name: file_name.to_path_buf(),
        id: PostId(id),
        date,
        author,
        tags: extract_tags(&tags),
        categories: extract_categories(&categories),
    };

    Ok((header, lines, maybe_line))
}

/// True when the first non-empty line opens a header block, either the
/// `<!--` comment or a bare `[KEY]: # (value)` line.
pub fn has_texted_header(lines: Lines) -> bool {
    match lines.map(|line| line.trim()).find(|line| !line.is_empty()) {
        Some(line) => line == "<!--" || extract_texted_header(line).is_some(),
        None => false,
    }
}

/// Header for markdown files written without one: the file stem is the id
/// and the last modification is the publish date.
pub fn generate_header_from_file(file_name: &Path) -> io::Result<ContentHeader> {
    let modified: DateTime<Local> = fs::metadata(file_name)?.modified()?.into();
    let id = match file_name.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => stem.to_string(),
        None => return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid post file name {}", file_name.display()))),
    };

    Ok(ContentHeader {
        file_name: file_name.to_path_buf(),
        id: PostId(id),
        date: modified.naive_local(),
        author: "".to_string(),
        tags: vec![],
        categories: vec![],
    })
}

pub fn parse_title_markdown<'a>(lines: Lines<'a>, mut maybe_line: Option<&'a str>) -> (String, Lines<'a>, Option<&'a str>) {
    let mut lines = lines;
    let title = loop {
        if let Some(line) = maybe_line {
            if let Some(title) = line.strip_prefix("# ") {
                break title.trim().to_string();
            }
        } else {
            break "".to_string();
        }
        maybe_line = lines.next();
    };
    (title, lines, maybe_line)
}

pub fn parse_title_html<'a>(lines: Lines<'a>, mut maybe_line: Option<&'a str>) -> (String, Lines<'a>, Option<&'a str>) {
    lazy_static! {
        static ref TITLE_REGEX: Regex = Regex::new(r"<h[12]>(?P<title>.+)</h[12]>").unwrap();
    }

    let mut lines = lines;
    let title = loop {
        if let Some(line) = maybe_line {
            if let Some(title) = TITLE_REGEX.captures(line).and_then(|cap| {
                cap.name("title").map(|v| v.as_str())
            }) {
                break title.to_string();
            }
        } else {
            break "".to_string();
        }
        maybe_line = lines.next();
    };
    (title, lines, maybe_line)
}

pub fn extract_content(lines: Lines) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}

fn extract_tags(tags_str: &str) -> Vec<String> {
    tags_str.split(' ')
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Categories may have spaces in their names, so they are comma separated
fn extract_categories(categories_str: &str) -> Vec<String> {
    categories_str.split(',')
        .map(|s| s.trim())
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn extract_texted_header(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex = Regex::new(r"\[(?P<key>\w+)\]: # \((?P<value>.*)\)").unwrap();
    }
    extract_header_key_val(line, &HEADER_REGEX)
}

fn extract_header_key_val<'a>(line: &'a str, header_regex: &Regex) -> Option<(&'a str, &'a str)> {
    header_regex.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|key| key.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val)),
            _ => None
        }
    })
}

pub fn remove_comments(md_post: &str) -> io::Result<String> {
    let mut res: String = String::new();
    let mut slice = Some(md_post);

    let start_comment = "<!--";
    let end_comment = "-->";

    while let Some(block) = slice {
        let md_buf: &str = match block.find(start_comment) {
            Some(start) => {
                let to_render: &str = &block[0..start];

                let next: &str = &block[(start + start_comment.len())..];
                match next.find(end_comment) {
                    Some(end) => {
                        slice = Some(&next[(end + end_comment.len())..]);
                    }
                    None => {
                        return Err(io::Error::new(
                            ErrorKind::InvalidData,
                            "Error finding end of comment",
                        ));
                    }
                };

                to_render
            }
            None => {
                slice = None;
                block
            }
        };
        res.push_str(md_buf);
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use super::*;

    #[test]
    fn test_extract_texted_header() {
        let res = extract_texted_header("[ID]: # (a63bd715-a3fe-4788-b0e1-2a3153778544)");
        assert_eq!(res, Some(("ID", "a63bd715-a3fe-4788-b0e1-2a3153778544")));
        let res = extract_texted_header("[DATE]: # (2022-04-02 12:05:00.000)");
        assert_eq!(res, Some(("DATE", "2022-04-02 12:05:00.000")));
        let res = extract_texted_header("[TAGS]: # (rust something-else)");
        assert_eq!(res, Some(("TAGS", "rust something-else")));
        let res = extract_texted_header("[CATEGORIES]: # (News, Rust Tips)");
        assert_eq!(res, Some(("CATEGORIES", "News, Rust Tips")));

        let res = extract_texted_header("[AUTHOR]: (thiago)");
        assert!(res.is_none());
    }

    #[test]
    fn test_extract_tags() {
        let tags = extract_tags("one two three   four");
        assert_eq!(tags, ["one", "two", "three", "four"]);
    }

    #[test]
    fn test_extract_categories() {
        let categories = extract_categories("News, Rust Tips ,, ");
        assert_eq!(categories, ["News", "Rust Tips"]);
        assert!(extract_categories("").is_empty());
    }

    #[test]
    fn test_lines_texted() {
        let file_name = PathBuf::from("posts/20200522_how_to_write_a_code_review/index.md");
        let content = r##"

<!--

[ID]: # (21c1e9ad-4ebb-4168-a543-fbf77cc35a85)

[DATE]: # (2024-02-12 22:54:00.000)

[AUTHOR]: # (thiago)

[CATEGORIES]: # (Code Review)

-->

# The title"##;

        let (header, _lines, next_line) = parse_texted_header(&file_name, content.lines()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 12).unwrap();
        let time = NaiveTime::from_hms_opt(22, 54, 0).unwrap();
        let expected = ContentHeader {
            file_name: PathBuf::from("posts/20200522_how_to_write_a_code_review/index.md"),
            id: PostId("21c1e9ad-4ebb-4168-a543-fbf77cc35a85".to_string()),
            date: NaiveDateTime::new(date, time),
            author: "thiago".to_string(),
            tags: vec![],
            categories: vec!["Code Review".to_string()],
        };
        assert_eq!(header, expected);
        assert_eq!(next_line, Some(""));
    }

    #[test]
    fn test_missing_comment_end() {
        let file_name = PathBuf::from("posts/broken.md");
        let content = "<!--\n[ID]: # (1)\n[DATE]: # (2024-02-12 22:54:00)\n# Title\n";
        let err = parse_texted_header(&file_name, content.lines()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_no_header() {
        let file_name = PathBuf::from("posts/plain.md");
        let err = parse_texted_header(&file_name, "# Just a title\n".lines()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_has_texted_header() {
        assert!(has_texted_header("\n<!--\n[ID]: # (1)\n-->\n".lines()));
        assert!(has_texted_header("[DATE]: # (2024-01-01)\n# Title\n".lines()));
        assert!(!has_texted_header("# Just a title\n<!--\n".lines()));
        assert!(!has_texted_header("".lines()));
    }

    #[test]
    fn test_parse_title_markdown() {
        let content = "\nsome text\n# The Title \nbody\n";
        let mut lines = content.lines();
        let first = lines.next();
        let (title, mut lines, _) = parse_title_markdown(lines, first);
        assert_eq!(title, "The Title");
        assert_eq!(lines.next(), Some("body"));
    }

    #[test]
    fn test_parse_title_html() {
        let content = "<p>intro</p>\n<h1>Html Title</h1>\n<p>body</p>";
        let mut lines = content.lines();
        let first = lines.next();
        let (title, lines, _) = parse_title_html(lines, first);
        assert_eq!(title, "Html Title");
        assert_eq!(extract_content(lines), "<p>body</p>\n");
    }

    #[test]
    fn test_parse_removes_comment() {
        let res = remove_comments("Some text.<!-- more -->Wo<!-- xyz -->rd").unwrap();
        assert_eq!(res, "Some text.Word");

        let res = remove_comments("").unwrap();
        assert_eq!(res, "");

        let res = remove_comments("<!-- more --><!-- xyz -->").unwrap();
        assert_eq!(res, "");

        assert!(remove_comments("text <!-- never closed").is_err());
    }
}
