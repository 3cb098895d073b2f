//! Core data models used throughout the toolkit.
//!
//! These types represent the verses, chapters, books, and session state that
//! flow through the parse, clean, query, and reader pipeline. Chapter and
//! verse numbers are `u32` in memory and serialize as decimal string keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw document read from a source directory before extraction.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path relative to the scanned root, used for ordering.
    pub source_id: String,
    /// File stem, the fallback book name.
    pub identifier: String,
    pub body: String,
}

/// A single extracted verse, before it is folded into a [`Corpus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// Verse number → verse text, iterated in ascending verse order.
pub type Chapter = BTreeMap<u32, String>;

/// One book of the corpus. The book's name is its key in [`Corpus::books`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub chapters: BTreeMap<u32, Chapter>,
    #[serde(default)]
    pub chapter_count: usize,
    #[serde(default)]
    pub verse_count: usize,
}

impl Book {
    /// Recompute `chapter_count` and `verse_count` from `chapters`.
    pub fn refresh_counts(&mut self) {
        self.chapter_count = self.chapters.len();
        self.verse_count = self.chapters.values().map(|c| c.len()).sum();
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.get(&number)
    }
}

/// The full collection of books, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub books: IndexMap<String, Book>,
    /// Source code (e.g. `Ge`) → canonical book name, discovered during
    /// line extraction.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub abbr_map: IndexMap<String, String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.get(name)
    }

    /// Set `books[book][chapter][verse] = text`, creating the book and
    /// chapter on first sight. A later write to the same triple wins.
    pub fn insert_verse(&mut self, verse: Verse) {
        self.books
            .entry(verse.book)
            .or_default()
            .chapters
            .entry(verse.chapter)
            .or_default()
            .insert(verse.verse, verse.text);
    }

    pub fn refresh_counts(&mut self) {
        for book in self.books.values_mut() {
            book.refresh_counts();
        }
    }

    pub fn total_chapters(&self) -> usize {
        self.books.values().map(|b| b.chapters.len()).sum()
    }

    pub fn total_verses(&self) -> usize {
        self.books
            .values()
            .flat_map(|b| b.chapters.values())
            .map(|c| c.len())
            .sum()
    }
}

/// Pacing mode controlling pause markers and blank-line grouping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Mid,
    Fast,
}

impl Speed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Mid => "mid",
            Speed::Fast => "fast",
        }
    }

    /// Number of verses after which a chapter rendering inserts a blank line.
    pub fn group_size(&self) -> Option<usize> {
        match self {
            Speed::Slow => Some(4),
            Speed::Mid => None,
            Speed::Fast => Some(10),
        }
    }

    /// Suggested reading time per verse.
    pub fn seconds_per_verse(&self) -> u64 {
        match self {
            Speed::Slow => 10,
            Speed::Mid => 5,
            Speed::Fast => 2,
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(Speed::Slow),
            "mid" => Ok(Speed::Mid),
            "fast" => Ok(Speed::Fast),
            other => Err(format!(
                "unknown speed '{}'; use slow, mid or fast",
                other
            )),
        }
    }
}

/// Navigation state persisted between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub book: Option<String>,
    pub chapter: Option<u32>,
    pub speed: Speed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_search: Option<String>,
}
