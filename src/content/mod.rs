use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::text_utils::slugify;

pub mod content_file;
pub mod content_format;
pub mod content_renderer;
pub mod parsing_utils;
pub mod html_renderer;
pub mod texted_renderer;

pub struct Content {
    pub header: ContentHeader,
    pub link: String,
    pub title: String,
    pub rendered: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentHeader {
    pub file_name: PathBuf,
    pub id: PostId,
    pub date: NaiveDateTime,
    pub author: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct PostId(pub String);

/// A tag or a category, as displayed and as matched.
#[derive(Debug, Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

impl Term {
    pub fn from_name(name: &str) -> Term {
        Term {
            name: name.to_string(),
            slug: slugify(name),
        }
    }
}
