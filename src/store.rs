//! JSON file persistence for the corpus and its derived files.
//!
//! Every write replaces the whole file: the document is serialized to a
//! sibling `*.tmp` file which is then renamed over the target.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::models::Corpus;

/// Load a corpus file. A missing file is fatal.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    if !path.exists() {
        bail!(
            "corpus file not found: {} (run `bible parse` first)",
            path.display()
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    let corpus: Corpus = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?;
    Ok(corpus)
}

pub fn save_corpus(path: &Path, corpus: &Corpus) -> Result<()> {
    write_json(path, corpus)
}

/// Pretty-print `value` as UTF-8 JSON and replace `path` with it.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
