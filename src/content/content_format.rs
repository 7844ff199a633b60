#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentFormat {
    Texted,
    Html,
}
