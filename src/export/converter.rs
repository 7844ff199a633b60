use std::io;

pub trait HtmlConverter {
    fn html_to_markdown(&self, html: &str) -> io::Result<String>;
}

/// Converter backed by the `htmd` crate
#[derive(Default)]
pub struct HtmdConverter {}

impl HtmlConverter for HtmdConverter {
    fn html_to_markdown(&self, html: &str) -> io::Result<String> {
        htmd::convert(html)
    }
}
