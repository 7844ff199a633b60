use fmt::Display;
use std::fmt;
use std::fmt::Formatter;

use chrono::NaiveDateTime;

use crate::content::{Content, PostId, Term};

/// A published post, as handed to the exporter. Never mutated after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body_html: String,
    pub permalink: String,
    pub slug: String,
    pub date: NaiveDateTime,
    pub author: String,
    pub tags: Vec<Term>,
    pub categories: Vec<Term>,
}

impl Post {
    /// `site_url` is the public root of the blog, posts live under `/view/{slug}/`
    pub fn from_content(content: Content, site_url: &str) -> Post {
        let permalink = permalink(site_url, &content.link);
        Post {
            id: content.header.id,
            title: content.title,
            body_html: content.rendered,
            permalink,
            slug: content.link,
            date: content.header.date,
            author: content.header.author,
            tags: terms(&content.header.tags),
            categories: terms(&content.header.categories),
        }
    }

    /// First category with a usable slug
    pub fn primary_category_slug(&self) -> Option<&str> {
        self.categories.iter()
            .map(|c| c.slug.as_str())
            .find(|slug| !slug.is_empty())
    }

    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }

    pub fn has_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }
}

/// Names made only of symbols have no slug and cannot be matched or used as a folder
fn terms(names: &[String]) -> Vec<Term> {
    names.iter()
        .map(|name| Term::from_name(name))
        .filter(|term| !term.slug.is_empty())
        .collect()
}

pub fn permalink(site_url: &str, slug: &str) -> String {
    format!("{}/view/{}/", site_url.trim_end_matches('/'), slug)
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, date={}, slug={}, title={}",
               self.id.0,
               self.date,
               self.slug,
               self.title,
        )
    }
}
