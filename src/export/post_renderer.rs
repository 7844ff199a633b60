use std::fmt::Write;

use crate::export::converter::HtmlConverter;
use crate::export::error::ExportError;
use crate::post::Post;

pub const UNCATEGORIZED: &str = "uncategorized";

/// One post ready to be stored in the archive
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub archive_path: String,
    pub markdown: String,
}

pub struct PostRenderer<'a> {
    converter: &'a dyn HtmlConverter,
}

impl<'a> PostRenderer<'a> {
    pub fn new(converter: &'a dyn HtmlConverter) -> Self {
        PostRenderer { converter }
    }

    pub fn render(&self, post: &Post) -> Result<RenderedDocument, ExportError> {
        let body = self.converter.html_to_markdown(&post.body_html)
            .map_err(|source| ExportError::Conversion {
                slug: post.slug.clone(),
                source,
            })?;

        let mut markdown = String::new();
        let _ = writeln!(&mut markdown, "# {}", post.title);
        let _ = writeln!(&mut markdown);
        let _ = writeln!(&mut markdown, "{}", body);
        let _ = writeln!(&mut markdown);
        let _ = writeln!(&mut markdown, "[Original Post]({})", post.permalink);

        Ok(RenderedDocument {
            archive_path: archive_path(post),
            markdown,
        })
    }
}

pub fn archive_path(post: &Post) -> String {
    let category = post.primary_category_slug().unwrap_or(UNCATEGORIZED);
    format!("content/{}/{}.md", category, post.slug)
}

/// `- [title](path)` per document, in export order
pub fn render_index(entries: &[(String, String)]) -> String {
    entries.iter()
        .map(|(title, path)| format!("- [{}]({})", title, path))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::ErrorKind;

    use chrono::NaiveDate;

    use crate::content::{PostId, Term};

    use super::*;

    struct UpperConverter {}

    impl HtmlConverter for UpperConverter {
        fn html_to_markdown(&self, html: &str) -> io::Result<String> {
            Ok(html.replace("<p>", "").replace("</p>", "").to_uppercase())
        }
    }

    struct FailingConverter {}

    impl HtmlConverter for FailingConverter {
        fn html_to_markdown(&self, _html: &str) -> io::Result<String> {
            Err(io::Error::new(ErrorKind::InvalidData, "bad html"))
        }
    }

    fn post(slug: &str, categories: &[&str]) -> Post {
        Post {
            id: PostId("1".to_string()),
            title: "Hello World".to_string(),
            body_html: "<p>some text</p>".to_string(),
            permalink: format!("https://example.com/view/{}/", slug),
            slug: slug.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            author: "thiago".to_string(),
            tags: vec![],
            categories: categories.iter().map(|c| Term::from_name(c)).collect(),
        }
    }

    #[test]
    fn test_render() {
        let converter = UpperConverter {};
        let doc = PostRenderer::new(&converter).render(&post("hello", &["News", "Rust"])).unwrap();
        assert_eq!(doc.archive_path, "content/news/hello.md");
        assert_eq!(doc.markdown, "# Hello World\n\nSOME TEXT\n\n[Original Post](https://example.com/view/hello/)\n");
    }

    #[test]
    fn test_uncategorized() {
        let converter = UpperConverter {};
        let doc = PostRenderer::new(&converter).render(&post("lonely", &[])).unwrap();
        assert_eq!(doc.archive_path, "content/uncategorized/lonely.md");
    }

    #[test]
    fn test_primary_category_is_first() {
        assert_eq!(archive_path(&post("a", &["Rust Tips", "News"])), "content/rust-tips/a.md");
    }

    #[test]
    fn test_category_without_slug_is_uncategorized() {
        assert_eq!(archive_path(&post("a", &["!!!", "🚀"])), "content/uncategorized/a.md");
        assert_eq!(archive_path(&post("b", &["🚀", "News"])), "content/news/b.md");
    }

    #[test]
    fn test_render_is_deterministic() {
        let converter = UpperConverter {};
        let renderer = PostRenderer::new(&converter);
        let p = post("same", &["News"]);
        assert_eq!(renderer.render(&p).unwrap(), renderer.render(&p).unwrap());
    }

    #[test]
    fn test_conversion_failure() {
        let converter = FailingConverter {};
        let err = PostRenderer::new(&converter).render(&post("broken", &[])).err().unwrap();
        match err {
            ExportError::Conversion { slug, .. } => assert_eq!(slug, "broken"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_render_index() {
        let entries = vec![
            ("A".to_string(), "content/news/a.md".to_string()),
            ("B".to_string(), "content/news/b.md".to_string()),
        ];
        assert_eq!(render_index(&entries), "- [A](content/news/a.md)\n- [B](content/news/b.md)");
        assert_eq!(render_index(&[]), "");
    }
}
