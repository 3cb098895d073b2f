use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SourcesConfig;
use crate::models::SourceDocument;

/// Read the whole line-oriented source file.
pub fn read_line_source(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("input not found: {}", path.display());
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read line source: {}", path.display()))
}

/// Collect the HTML documents under `root` that match the configured globs,
/// sorted by relative path.
pub fn scan_html_documents(sources: &SourcesConfig, root: &Path) -> Result<Vec<SourceDocument>> {
    if !root.is_dir() {
        bail!("input not found: {}", root.display());
    }

    let mut docs = Vec::new();

    for (path, rel_str) in matching_files(sources, root)? {
        let body = match std::fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                continue;
            }
        };

        let identifier = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| rel_str.clone());

        docs.push(SourceDocument {
            source_id: rel_str,
            identifier,
            body,
        });
    }

    docs.sort_by(|a, b| a.source_id.cmp(&b.source_id));

    Ok(docs)
}

/// Count the documents `scan_html_documents` would pick up, without reading them.
pub fn count_html_documents(sources: &SourcesConfig, root: &Path) -> Result<usize> {
    Ok(matching_files(sources, root)?.len())
}

/// Walk `root` and return `(path, relative path)` for every file that passes
/// the include and exclude globs.
fn matching_files(sources: &SourcesConfig, root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let include_set = build_globset(&sources.include_globs)?;
    let exclude_set = build_globset(&sources.exclude_globs)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }

        files.push((path.to_path_buf(), rel_str));
    }
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
