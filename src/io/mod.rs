pub mod archive;
pub mod walker;

pub use archive::{ProjectArchive, ScratchDir};
pub use walker::{discover_source_files, FileWalker};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn get_file_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path)?;
    Ok(metadata.len())
}
