use crate::core::{Language, SourceFile};
use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Recursive discovery of supported source files under an extracted
/// project root.
pub struct FileWalker {
    root: PathBuf,
    languages: Vec<Language>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            languages: vec![Language::Python, Language::JavaScript],
        }
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn walk(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let language = Language::from_path(path);
            if !self.languages.contains(&language) {
                continue;
            }

            let size_bytes = super::get_file_size(path).unwrap_or(0);
            files.push(SourceFile {
                path: path.to_path_buf(),
                language,
                size_bytes,
            });
        }

        // Walk order is platform-dependent; sort so downstream output is
        // stable across runs.
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

pub fn discover_source_files(root: &Path) -> Result<Vec<SourceFile>> {
    FileWalker::new(root.to_path_buf()).walk()
}
