use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use spdlog::debug;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const STAGING_DIR: &str = "entries";
const ARCHIVE_NAME: &str = "export.zip";

/// Write-once ZIP archive staged in its own temporary directory.
///
/// Entries are staged as plain files, so adding a path twice keeps the last
/// content. [`ArchiveBuilder::finalize`] consumes the builder and packs the
/// entries in the order their paths were first added. The directory is removed
/// when the builder, or the [`FinishedArchive`] it turned into, is dropped.
pub struct ArchiveBuilder {
    temp_dir: TempDir,
    entries: Vec<String>,
    known: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn open(temp_root: Option<&Path>) -> io::Result<ArchiveBuilder> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mdexport");
        let temp_dir = match temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        fs::create_dir(temp_dir.path().join(STAGING_DIR))?;
        debug!("Archive staging directory created at {}", temp_dir.path().display());

        Ok(ArchiveBuilder {
            temp_dir,
            entries: vec![],
            known: HashSet::new(),
        })
    }

    pub fn add(&mut self, path: &str, content: &[u8]) -> io::Result<()> {
        let staged = self.staged_path(path)?;
        if let Some(parent) = staged.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&staged, content)?;

        if self.known.insert(path.to_string()) {
            self.entries.push(path.to_string());
        } else {
            debug!("Archive entry {} replaced", path);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finalize(self) -> io::Result<FinishedArchive> {
        let archive_path = self.temp_dir.path().join(ARCHIVE_NAME);
        let file = File::create(&archive_path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in self.entries.iter() {
            let content = fs::read(self.staged_path(entry)?)?;
            zip.start_file(entry.as_str(), options).map_err(zip_error)?;
            zip.write_all(&content)?;
        }

        let mut file = zip.finish().map_err(zip_error)?;
        file.flush()?;
        let len = file.metadata()?.len();
        drop(file);

        fs::remove_dir_all(self.temp_dir.path().join(STAGING_DIR))?;
        debug!("Archive sealed with {} entries, {} bytes", self.entries.len(), len);

        Ok(FinishedArchive {
            _temp_dir: self.temp_dir,
            path: archive_path,
            len,
        })
    }

    fn staged_path(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        let valid = !path.is_empty() && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid archive path {}", path)));
        }
        Ok(self.temp_dir.path().join(STAGING_DIR).join(relative))
    }
}

/// A sealed archive. The file is deleted together with this value.
pub struct FinishedArchive {
    _temp_dir: TempDir,
    path: PathBuf,
    len: u64,
}

impl FinishedArchive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    /// Reads the archive and releases the temporary storage
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        self.read_bytes()
    }
}

fn zip_error(e: zip::result::ZipError) -> io::Error {
    io::Error::new(ErrorKind::Other, e)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use zip::ZipArchive;

    use super::*;

    fn entries(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut res = vec![];
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = String::new();
            file.read_to_string(&mut content).unwrap();
            res.push((file.name().to_string(), content));
        }
        res
    }

    #[test]
    fn test_entries_keep_add_order() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let mut builder = ArchiveBuilder::open(Some(root.path()))?;
        builder.add("content/news/b.md", b"B")?;
        builder.add("content/news/a.md", b"A")?;
        builder.add("index.md", b"index")?;
        let archive = builder.finalize()?;

        assert_eq!(entries(archive.into_bytes()?), vec![
            ("content/news/b.md".to_string(), "B".to_string()),
            ("content/news/a.md".to_string(), "A".to_string()),
            ("index.md".to_string(), "index".to_string()),
        ]);
        Ok(())
    }

    #[test]
    fn test_last_write_wins() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let mut builder = ArchiveBuilder::open(Some(root.path()))?;
        builder.add("a.md", b"x")?;
        builder.add("a.md", b"y")?;
        assert_eq!(builder.len(), 1);
        let archive = builder.finalize()?;

        assert_eq!(entries(archive.into_bytes()?), vec![("a.md".to_string(), "y".to_string())]);
        Ok(())
    }

    #[test]
    fn test_invalid_paths() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let mut builder = ArchiveBuilder::open(Some(root.path()))?;
        for path in ["", "../escape.md", "content/../../x.md", "/etc/passwd", "./a.md"] {
            let err = builder.add(path, b"x").err().unwrap();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "path {}", path);
        }
        assert!(builder.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_archive() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let archive = ArchiveBuilder::open(Some(root.path()))?.finalize()?;
        assert!(!archive.is_empty());
        assert!(entries(archive.read_bytes()?).is_empty());
        Ok(())
    }

    #[test]
    fn test_finished_archive_metadata() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let mut builder = ArchiveBuilder::open(Some(root.path()))?;
        builder.add("index.md", b"- [A](content/news/a.md)")?;
        let archive = builder.finalize()?;
        assert!(archive.path().exists());
        assert_eq!(archive.len(), archive.read_bytes()?.len() as u64);
        Ok(())
    }

    #[test]
    fn test_temporary_storage_released() -> io::Result<()> {
        let root = tempfile::tempdir()?;
        let count = || fs::read_dir(root.path()).unwrap().count();

        let mut builder = ArchiveBuilder::open(Some(root.path()))?;
        builder.add("a.md", b"a")?;
        assert_eq!(count(), 1);
        drop(builder);
        assert_eq!(count(), 0);

        let mut builder = ArchiveBuilder::open(Some(root.path()))?;
        builder.add("a.md", b"a")?;
        let archive = builder.finalize()?;
        let path = archive.path().to_path_buf();
        assert_eq!(count(), 1);
        archive.into_bytes()?;
        assert!(!path.exists());
        assert_eq!(count(), 0);
        Ok(())
    }

    #[test]
    fn test_open_fails_on_missing_root() {
        assert!(ArchiveBuilder::open(Some(Path::new("/does/not/exist/mdexport"))).is_err());
    }
}
