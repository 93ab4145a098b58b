use crate::errors::DocscoreError;
use anyhow::Result;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// A project archive opened for inspection and extraction.
///
/// The archive is held in memory, so a single open serves both the cheap
/// entry-name sniff and the later full extraction without re-reading the
/// source.
#[derive(Debug)]
pub struct ProjectArchive {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    origin: Option<PathBuf>,
}

impl ProjectArchive {
    /// Open a zip archive from a path on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            DocscoreError::archive_with_path(format!("cannot read archive: {e}"), path)
        })?;
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            DocscoreError::archive_with_path(format!("cannot open archive: {e}"), path)
        })?;
        Ok(Self {
            archive,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Open a zip archive already held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocscoreError::archive(format!("cannot open archive: {e}")))?;
        Ok(Self {
            archive,
            origin: None,
        })
    }

    /// Entry names in archive order, for extension sniffing without paying
    /// for extraction.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    /// Materialize the whole archive into a fresh scratch directory. The
    /// returned guard removes the directory when dropped, on every exit
    /// path.
    pub fn extract_to_scratch(&mut self) -> Result<ScratchDir> {
        let scratch = ScratchDir::new()?;
        self.archive.extract(scratch.path()).map_err(|e| {
            match &self.origin {
                Some(path) => {
                    DocscoreError::archive_with_path(format!("extraction failed: {e}"), path)
                }
                None => DocscoreError::archive(format!("extraction failed: {e}")),
            }
        })?;
        Ok(scratch)
    }
}

/// Scoped scratch directory for extracted archive contents.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("docscore-")
            .tempdir()
            .map_err(|e| DocscoreError::archive(format!("cannot create scratch dir: {e}")))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
