use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::content::Content;
use crate::content::content_format::ContentFormat;
use crate::content::content_renderer::{ContentRenderer, RenderOptions};
use crate::content::html_renderer::HtmlRenderer;
use crate::content::texted_renderer::TextedRenderer;

pub struct ContentFile {
    pub link: String,
    pub file_path: PathBuf,
    pub format: ContentFormat,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(link: String, file_path: PathBuf) -> io::Result<ContentFile> {
        let format = match Self::guess_type(&file_path) {
            None => return Err(io::Error::new(ErrorKind::Unsupported, format!("Could not guess the type of the file {}", file_path.display()))),
            Some(format) => format,
        };

        let raw_content = fs::read_to_string(&file_path)?;

        Ok(ContentFile {
            link,
            file_path,
            format,
            raw_content,
        })
    }

    pub fn render(&self, render_options: RenderOptions) -> io::Result<Content> {
        match self.format {
            ContentFormat::Texted => TextedRenderer::render(self, render_options),
            ContentFormat::Html => HtmlRenderer::render(self, render_options),
        }
    }

    pub fn guess_type(file_name: &Path) -> Option<ContentFormat> {
        let extension = file_name.extension()?.to_str()?;
        match extension {
            "md" => Some(ContentFormat::Texted),
            "html" | "htm" => Some(ContentFormat::Html),
            _ => None,
        }
    }
}
