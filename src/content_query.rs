use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use spdlog::{debug, warn};

use crate::content::Term;
use crate::content::content_file::ContentFile;
use crate::content::content_renderer::{ImagePrefix, RenderOptions};
use crate::export::filter::Filter;
use crate::post::{permalink, Post};
use crate::post_list::PostList;
use crate::text_utils::slugify;

/// Constraints sent to a [`PostRepository`]. `None` leaves an axis unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub tag: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl PostQuery {
    /// Both date bounds are inclusive: a post published any time on `date_to` matches.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(ref tag) = self.tag {
            if !post.has_tag(tag) {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if !post.has_category(category) {
                return false;
            }
        }

        let published = post.date.date();
        if let Some(from) = self.date_from {
            if published < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if published > to {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Terms {
    pub tags: Vec<Term>,
    pub categories: Vec<Term>,
}

pub trait PostRepository {
    /// Posts matching `query`, newest first.
    fn query_posts(&self, query: &PostQuery) -> io::Result<Vec<Post>>;

    /// Every tag and category in use, sorted by name.
    fn terms(&self) -> io::Result<Terms>;
}

/// Newest first. Posts published at the same time are ordered by slug.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
    });
}

pub struct ContentQuery<'a> {
    repository: &'a dyn PostRepository,
}

impl<'a> ContentQuery<'a> {
    pub fn new(repository: &'a dyn PostRepository) -> Self {
        ContentQuery { repository }
    }

    pub fn find(&self, filter: &Filter) -> io::Result<Vec<Post>> {
        let query = PostQuery {
            tag: filter.tag.as_deref().map(slugify),
            category: filter.category.as_deref().map(slugify),
            date_from: filter.date_from,
            date_to: filter.date_to,
        };
        debug!("Querying posts with {:?}", query);
        self.repository.query_posts(&query)
    }
}

/// Reads posts straight from the blog's posts directory.
pub struct FilePostRepository {
    post_list: PostList,
    site_url: String,
}

impl FilePostRepository {
    pub fn new(posts_dir: PathBuf, index_base_name: &str, site_url: &str) -> Self {
        FilePostRepository {
            post_list: PostList {
                root_dir: posts_dir,
                post_file: index_base_name.to_string(),
            },
            site_url: site_url.to_string(),
        }
    }

    fn load_posts(&self) -> io::Result<Vec<Post>> {
        let mut posts = vec![];
        for link in self.post_list.retrieve_links()? {
            let img_prefix = ImagePrefix(permalink(&self.site_url, &link.post_name));
            let content = ContentFile::from_file(link.post_name.clone(), link.post_path.clone())
                .and_then(|file| file.render(RenderOptions::AbsoluteImages(img_prefix)));

            match content {
                Ok(content) => posts.push(Post::from_content(content, &self.site_url)),
                Err(e) => warn!("Skipping post {}: {}", link.post_path.display(), e),
            }
        }
        Ok(posts)
    }
}

impl PostRepository for FilePostRepository {
    fn query_posts(&self, query: &PostQuery) -> io::Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.load_posts()?
            .into_iter()
            .filter(|post| query.matches(post))
            .collect();
        sort_posts(&mut posts);
        Ok(posts)
    }

    fn terms(&self) -> io::Result<Terms> {
        let mut tags = BTreeSet::new();
        let mut categories = BTreeSet::new();
        for post in self.load_posts()? {
            tags.extend(post.tags);
            categories.extend(post.categories);
        }

        Ok(Terms {
            tags: tags.into_iter().collect(),
            categories: categories.into_iter().collect(),
        })
    }
}
