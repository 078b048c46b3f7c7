//! Filesystem helpers for the article actions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_article(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// All `*.md` files under `dir`, recursively, in path order.
///
/// Entries that cannot be walked come back as `Err` in place; the walk
/// carries on past them.
pub fn markdown_files(dir: &Path) -> Vec<Result<PathBuf>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => (entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "md"))
            .then(|| Ok(entry.into_path())),
            Err(err) => {
                let path = err.path().unwrap_or(dir).display().to_string();
                Some(Err(anyhow::Error::new(err).context(path)))
            }
        })
        .collect()
}

/// Read an article as UTF-8 text.
pub fn read_article(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Remove a single article file.
pub fn remove_article(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("remove {}", path.display()))
}
