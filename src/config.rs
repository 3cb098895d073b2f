//! TOML configuration.
//!
//! Every section is optional. A missing config file is not an error for the
//! CLI: [`load_config_or_minimal`] falls back to [`Config::minimal`], which
//! mirrors the conventional `data/` and `cut/` layout.

use anyhow::{Context, Result};
use globset::Glob;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::Speed;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Locations of the files the toolkit reads and writes.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
    #[serde(default = "default_backup")]
    pub backup: PathBuf,
    #[serde(default = "default_session")]
    pub session: PathBuf,
    #[serde(default = "default_export")]
    pub export: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            backup: default_backup(),
            session: default_session(),
            export: default_export(),
        }
    }
}

fn default_corpus() -> PathBuf {
    PathBuf::from("data/bible.json")
}
fn default_backup() -> PathBuf {
    PathBuf::from("data/bible.json.bak")
}
fn default_session() -> PathBuf {
    PathBuf::from("data/session.json")
}
fn default_export() -> PathBuf {
    PathBuf::from("data/bible_cuv.json")
}

/// Raw inputs for `bible parse`.
#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_lines")]
    pub lines: PathBuf,
    #[serde(default = "default_html_dir")]
    pub html_dir: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            lines: default_lines(),
            html_dir: default_html_dir(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_lines() -> PathBuf {
    PathBuf::from("cut/books.txt")
}
fn default_html_dir() -> PathBuf {
    PathBuf::from("cut")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.htm".to_string(), "*.html".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default)]
    pub default_speed: Speed,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            default_speed: Speed::default(),
        }
    }
}

fn default_top() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExportConfig {
    /// Book name → abbreviation, used to fill the `abbr` field on export.
    #[serde(default)]
    pub abbreviations: IndexMap<String, String>,
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.query.top == 0 {
        anyhow::bail!("query.top must be >= 1");
    }

    if config.sources.include_globs.is_empty() {
        anyhow::bail!("sources.include_globs must not be empty");
    }

    for pattern in config
        .sources
        .include_globs
        .iter()
        .chain(&config.sources.exclude_globs)
    {
        Glob::new(pattern).with_context(|| format!("Invalid glob in [sources]: {}", pattern))?;
    }

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_config_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("bible.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.data.corpus, PathBuf::from("data/bible.json"));
        assert_eq!(cfg.query.top, 10);
        assert_eq!(cfg.query.default_speed, Speed::Mid);
        assert_eq!(cfg.sources.include_globs.len(), 2);
    }

    #[test]
    fn test_sections_override_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[data]
corpus = "out/corpus.json"

[query]
top = 3
default_speed = "slow"

[export.abbreviations]
"創世記" = "Gen"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.data.corpus, PathBuf::from("out/corpus.json"));
        assert_eq!(cfg.data.session, PathBuf::from("data/session.json"));
        assert_eq!(cfg.query.top, 3);
        assert_eq!(cfg.query.default_speed, Speed::Slow);
        assert_eq!(
            cfg.export.abbreviations.get("創世記").map(String::as_str),
            Some("Gen")
        );
    }

    #[test]
    fn test_zero_top_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[query]\ntop = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_unknown_speed_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[query]\ndefault_speed = \"warp\"\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config_or_minimal(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.data.backup, PathBuf::from("data/bible.json.bak"));
    }
}
