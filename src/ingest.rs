//! Parse pipeline orchestration.
//!
//! Coordinates the flow: source → extraction → corpus folding → corpus file.
//! Two entry points exist, one per source format; both end in the same
//! corpus shape with per-book `chapter_count` / `verse_count` attached.

use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;

use crate::config::Config;
use crate::connector_fs;
use crate::extract;
use crate::models::{Corpus, Verse};
use crate::store;

/// Folds verses into a [`Corpus`].
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    corpus: Corpus,
    verses_added: usize,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` without adding verses to it.
    pub fn ensure_book(&mut self, name: String) {
        self.corpus.books.entry(name).or_default();
    }

    pub fn add(&mut self, verse: Verse) {
        self.corpus.insert_verse(verse);
        self.verses_added += 1;
    }

    /// Number of records folded so far, duplicates included.
    pub fn verses_added(&self) -> usize {
        self.verses_added
    }

    /// Finish folding and compute per-book counts.
    pub fn finish(mut self, abbr_map: IndexMap<String, String>) -> Corpus {
        self.corpus.abbr_map = abbr_map;
        self.corpus.refresh_counts();
        self.corpus
    }
}

impl Extend<Verse> for CorpusBuilder {
    fn extend<I: IntoIterator<Item = Verse>>(&mut self, iter: I) {
        for verse in iter {
            self.add(verse);
        }
    }
}

/// Summary of one parse run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStats {
    pub verses: usize,
    pub books: usize,
    pub documents: usize,
}

/// Build a corpus from line-oriented text.
pub fn build_from_lines(text: &str) -> (Corpus, ParseStats) {
    let (verses, abbr_map) = extract::extract_lines(text);
    let mut builder = CorpusBuilder::new();
    builder.extend(verses);
    let verses = builder.verses_added();
    let corpus = builder.finish(abbr_map);
    let stats = ParseStats {
        verses,
        books: corpus.books.len(),
        documents: 1,
    };
    (corpus, stats)
}

/// Build a corpus from `(identifier, html)` documents, in the given order.
///
/// Every document registers its book, even when no verse marker matched, so
/// headings without content show up as empty books for `bible clean`.
pub fn build_from_html<'a, I>(documents: I) -> (Corpus, ParseStats)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut builder = CorpusBuilder::new();
    let mut count = 0;
    for (identifier, html) in documents {
        let (book, verses) = extract::extract_html(html, identifier);
        builder.ensure_book(book);
        builder.extend(verses);
        count += 1;
    }
    let verses = builder.verses_added();
    let corpus = builder.finish(IndexMap::new());
    let stats = ParseStats {
        verses,
        books: corpus.books.len(),
        documents: count,
    };
    (corpus, stats)
}

/// `bible parse lines`
pub fn run_parse_lines(config: &Config, input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let input = input.unwrap_or(&config.sources.lines);
    let output = output.unwrap_or(&config.data.corpus);

    let text = connector_fs::read_line_source(input)?;
    let (corpus, stats) = build_from_lines(&text);
    store::save_corpus(output, &corpus)?;

    tracing::info!(
        verses = stats.verses,
        books = stats.books,
        codes = corpus.abbr_map.len(),
        "parsed line source"
    );
    println!(
        "Parsed {} verses into {} books. Output: {}",
        stats.verses,
        stats.books,
        output.display()
    );
    Ok(())
}

/// `bible parse html`
pub fn run_parse_html(config: &Config, dir: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let dir = dir.unwrap_or(&config.sources.html_dir);
    let output = output.unwrap_or(&config.data.corpus);

    let docs = connector_fs::scan_html_documents(&config.sources, dir)?;
    let (corpus, stats) = build_from_html(
        docs.iter()
            .map(|d| (d.identifier.as_str(), d.body.as_str())),
    );
    store::save_corpus(output, &corpus)?;

    tracing::info!(
        verses = stats.verses,
        books = stats.books,
        documents = stats.documents,
        "parsed html source"
    );
    println!(
        "Parsed {} verses from {} HTML files. Books found: {}. Output: {}",
        stats.verses,
        stats.documents,
        stats.books,
        output.display()
    );
    Ok(())
}
