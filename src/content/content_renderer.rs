use std::io;

use crate::content::Content;
use crate::content::content_file::ContentFile;

/// Base URL prepended to relative image sources.
#[derive(Clone)]
pub struct ImagePrefix(pub String);

#[derive(Clone)]
pub enum RenderOptions {
    FullContent,
    AbsoluteImages(ImagePrefix),
}

pub trait ContentRenderer {
    fn render(content_file: &ContentFile, render_options: RenderOptions) -> io::Result<Content>;
}
