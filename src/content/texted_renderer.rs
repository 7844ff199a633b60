use std::io;
use std::io::ErrorKind;
use std::path::Path;
use std::str::Lines;

use markdown::Options;

use crate::content::content_file::ContentFile;
use crate::content::content_format::ContentFormat;
use crate::content::content_renderer::{ContentRenderer, ImagePrefix, RenderOptions};
use crate::content::parsing_utils::{extract_content, generate_header_from_file, has_texted_header, parse_texted_header, parse_title_markdown, remove_comments};
use crate::content::{Content, ContentHeader};

pub struct TextedRenderer {}

impl ContentRenderer for TextedRenderer {
    fn render(content_file: &ContentFile, render_options: RenderOptions) -> io::Result<Content> {
        if content_file.format != ContentFormat::Texted {
            return Err(io::Error::new(ErrorKind::InvalidData, format!("Unsupported format: {:?}", content_file.format)));
        }

        let link = content_file.link.clone();
        let (header, lines, maybe_line) = Self::parse_markdown_header(&content_file.file_path, content_file.raw_content.lines())?;
        let (title, lines, _title_line) = parse_title_markdown(lines, maybe_line);
        let content = extract_content(lines);

        let prefix = match render_options {
            RenderOptions::AbsoluteImages(ImagePrefix(ref prefix)) => Some(prefix.as_str()),
            RenderOptions::FullContent => None,
        };
        let rendered = Self::render_markdown(&content, prefix)?;

        Ok(Content {
            header,
            link,
            title,
            rendered,
        })
    }
}

impl TextedRenderer {
    pub fn parse_markdown_header<'a>(file_name: &Path, lines: Lines<'a>) -> io::Result<(ContentHeader, Lines<'a>, Option<&'a str>)> {
        // A broken header is an error, only posts without any header fall back to the file
        if has_texted_header(lines.clone()) {
            return parse_texted_header(file_name, lines);
        }
        let header = generate_header_from_file(file_name)?;
        Ok((header, lines, Some("")))
    }

    fn render_markdown(md_text: &str, img_prefix: Option<&str>) -> io::Result<String> {
        let buf = remove_comments(md_text)?;
        let buf = if let Some(img_prefix) = img_prefix {
            Self::change_images(img_prefix, buf.as_str())
        } else {
            buf
        };
        match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
            Ok(x) => Ok(x),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
        }
    }

    fn change_images(post_name: &str, md_post: &str) -> String {
        let mut parsed_string = String::new();
        let mut remaining_input = md_post;

        while let Some(text_start) = remaining_input.find("![") {
            let text_end = text_start + 2;

            // Append the text before the ![ pattern
            parsed_string.push_str(&remaining_input[0..text_end]);
            remaining_input = &remaining_input[text_end..];

            // Look for the closing bracket of the link text
            if let Some(link_end) = remaining_input.find("](") {
                let link_text = &remaining_input[..link_end];
                let url_start = link_end + 2; // For ](

                let url_start_slice = &remaining_input[url_start..];
                if let Some(url_end) = url_start_slice.find(')') {
                    let url = &url_start_slice[..url_end];
                    let prefixed_url = if url.contains("://") {
                        url.to_string()
                    } else if post_name.ends_with('/') {
                        format!("{}{}", post_name, url)
                    } else {
                        format!("{}/{}", post_name, url)
                    };

                    parsed_string.push_str(link_text);
                    parsed_string.push_str("](");
                    parsed_string.push_str(&prefixed_url);
                    parsed_string.push(')');

                    remaining_input = &url_start_slice[url_end + 1..];
                }
            }
        }

        // Append any remaining text after the last pattern
        parsed_string.push_str(remaining_input);

        parsed_string
    }
}
