use std::{fs, io};
use std::path::{Path, PathBuf};

use crate::content::content_file::ContentFile;

pub struct PostList {
    pub root_dir: PathBuf,
    pub post_file: String,
}

#[derive(Debug, PartialEq)]
pub struct PostLink {
    pub post_name: String,
    pub post_path: PathBuf,
}

impl PostList {
    /// Directory posts (`<root>/<name>/<post_file>*`) followed by single file posts (`<root>/<name>.md`)
    pub fn retrieve_links(&self) -> io::Result<Vec<PostLink>> {
        let mut posts = vec![];
        for (dir, file_name) in self.retrieve_dirs()? {
            let Some(post_name) = dir.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            posts.push(PostLink {
                post_name: post_name.to_string(),
                post_path: dir.join(file_name),
            });
        }

        for post_path in self.retrieve_files()? {
            let Some(post_name) = post_path.file_stem().and_then(|name| name.to_str()) else {
                continue;
            };
            posts.push(PostLink {
                post_name: post_name.to_string(),
                post_path: post_path.clone(),
            });
        }

        Ok(posts)
    }

    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        for entry in fs::read_dir(self.root_dir.as_path())?.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_file() && ContentFile::guess_type(&entry.path()).is_some() {
                    posts.push(entry.path());
                }
            }
        }
        Ok(posts)
    }

    pub fn retrieve_dirs(&self) -> io::Result<Vec<(PathBuf, String)>> {
        // Per directory, we should have a file called post.md
        let dirs = Self::list_dirs(self.root_dir.as_path())?;
        // Filtering only the dirs with a post inside
        Self::filter_dirs(&self.post_file, dirs)
    }

    fn list_dirs(posts_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = vec![];
        for entry in fs::read_dir(posts_dir)?.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_dir() {
                    dirs.push(entry.path());
                }
            }
        }
        Ok(dirs)
    }

    fn filter_dirs(post_file: &str, dirs: Vec<PathBuf>) -> io::Result<Vec<(PathBuf, String)>> {
        let mut post_dirs = vec![];
        for dir in dirs {
            if let Some(file_name) = Self::contains_file(&dir, post_file)? {
                post_dirs.push((dir, file_name));
            }
        }
        Ok(post_dirs)
    }

    fn contains_file(dir: &Path, base_name: &str) -> io::Result<Option<String>> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(|name| name.to_string()) else {
                continue;
            };
            if file_name.starts_with(base_name) && ContentFile::guess_type(Path::new(&file_name)).is_some() {
                return Ok(Some(file_name));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_retrieve_links() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        fs::create_dir_all(root.path().join("with_dir"))?;
        fs::write(root.path().join("with_dir").join("index.md"), "# a")?;
        fs::write(root.path().join("with_dir").join("image.png"), "png")?;
        fs::create_dir_all(root.path().join("only_images"))?;
        fs::write(root.path().join("only_images").join("image.png"), "png")?;
        fs::write(root.path().join("single.html"), "<h1>b</h1>")?;
        fs::write(root.path().join("notes.txt"), "ignored")?;

        let post_list = PostList { root_dir: root.path().to_path_buf(), post_file: "index".to_string() };
        let links = post_list.retrieve_links()?;

        assert_eq!(links, vec![
            PostLink { post_name: "with_dir".to_string(), post_path: root.path().join("with_dir").join("index.md") },
            PostLink { post_name: "single".to_string(), post_path: root.path().join("single.html") },
        ]);
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let post_list = PostList { root_dir: PathBuf::from("/does/not/exist"), post_file: "index".to_string() };
        assert!(post_list.retrieve_links().is_err());
    }
}
