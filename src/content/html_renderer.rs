use std::io;
use std::io::ErrorKind;

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::Content;
use crate::content::content_file::ContentFile;
use crate::content::content_format::ContentFormat;
use crate::content::content_renderer::{ContentRenderer, ImagePrefix, RenderOptions};
use crate::content::parsing_utils::{extract_content, parse_texted_header, parse_title_html};

pub struct HtmlRenderer {}

impl ContentRenderer for HtmlRenderer {
    fn render(content_file: &ContentFile, render_options: RenderOptions) -> io::Result<Content> {
        if content_file.format != ContentFormat::Html {
            return Err(io::Error::new(ErrorKind::InvalidData, format!("Unsupported format: {:?}", content_file.format)));
        }

        let link = content_file.link.clone();
        // The header is the same for HTML, but always living in an HTML comment block in the top of the file
        let (header, lines, maybe_line) = parse_texted_header(&content_file.file_path, content_file.raw_content.lines())?;
        let (title, lines, _title_line) = parse_title_html(lines, maybe_line);
        let content = extract_content(lines);

        let rendered = match render_options {
            RenderOptions::AbsoluteImages(ImagePrefix(prefix)) => Self::change_images(&prefix, &content),
            RenderOptions::FullContent => content,
        };

        Ok(Content {
            header,
            link,
            title,
            rendered,
        })
    }
}

impl HtmlRenderer {
    fn change_images(prefix: &str, html: &str) -> String {
        lazy_static! {
            static ref IMG_REGEX: Regex = Regex::new(r#"<img[^>]*src="([^"]*)"[^>]*>"#).unwrap();
        }

        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };

        let result = IMG_REGEX.replace_all(html, |captures: &regex::Captures| {
            let tag = &captures[0];
            let src = &captures[1];
            if src.contains("://") {
                tag.to_string()
            } else {
                tag.replace(src, &format!("{}{}", prefix, src))
            }
        });

        result.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::test_data::POST_DATA_HTML;

    use super::*;

    #[test]
    fn test_full_content_html() {
        let content = ContentFile {
            link: "first_html".to_string(),
            file_path: PathBuf::from("posts/first_html/index.html"),
            format: ContentFormat::Html,
            raw_content: POST_DATA_HTML.to_string(),
        };
        let content = HtmlRenderer::render(&content, RenderOptions::FullContent).unwrap();
        assert_eq!(content.title, "Hello from HTML");
        assert_eq!(content.header.categories, vec!["News".to_string()]);
        assert_eq!(content.rendered, r##"<p>Paragraph with <strong>bold</strong> text.</p>
<img src="diagram.png">
"##);
    }

    #[test]
    fn test_absolute_images() {
        let content = ContentFile {
            link: "first_html".to_string(),
            file_path: PathBuf::from("posts/first_html/index.html"),
            format: ContentFormat::Html,
            raw_content: POST_DATA_HTML.to_string(),
        };
        let prefix = ImagePrefix("https://example.com/view/first_html".to_string());
        let content = HtmlRenderer::render(&content, RenderOptions::AbsoluteImages(prefix)).unwrap();
        assert!(content.rendered.contains(r#"<img src="https://example.com/view/first_html/diagram.png">"#));
    }

    #[test]
    fn test_change_images() {
        let html = r#"<html>
<body>
    <img src="image1.jpg">
    <img some="212" src="image2.jpg">
    <img style="asd" src="image3.jpg" type="ddd">
    <img style="asd" src="http://not-change/image4.jpg" type="ddd">
    <img style="asd" src="https://not-change/image5.jpg" type="ddd">
    <img src="ftp://not-change/image5.jpg">
</body>
</html>"#;

        let prefixed_html = HtmlRenderer::change_images("view/post_name", html);
        assert_eq!(prefixed_html, r#"<html>
<body>
    <img src="view/post_name/image1.jpg">
    <img some="212" src="view/post_name/image2.jpg">
    <img style="asd" src="view/post_name/image3.jpg" type="ddd">
    <img style="asd" src="http://not-change/image4.jpg" type="ddd">
    <img style="asd" src="https://not-change/image5.jpg" type="ddd">
    <img src="ftp://not-change/image5.jpg">
</body>
</html>"#);
    }

    #[test]
    fn test_wrong_format() {
        let content = ContentFile {
            link: "".to_string(),
            file_path: PathBuf::from("posts/post.md"),
            format: ContentFormat::Texted,
            raw_content: "".to_string(),
        };
        assert!(HtmlRenderer::render(&content, RenderOptions::FullContent).is_err());
    }
}
