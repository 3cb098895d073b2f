//! Export the corpus in ordered list form.
//!
//! Produces a file where books, chapters and verses are JSON arrays instead
//! of keyed objects, which is simpler for front ends to walk. The reshape is
//! pure; the corpus file is never modified.

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::models::Corpus;
use crate::store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedCorpus {
    pub books: Vec<OrderedBook>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedBook {
    pub name: String,
    /// Blank unless an abbreviation mapping supplies one.
    pub abbr: String,
    pub chapters: Vec<OrderedChapter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedChapter {
    pub chapter: u32,
    pub verses: Vec<String>,
}

/// Reshape `corpus` into ordered form. Books keep corpus order; chapters and
/// verses are ascending by number.
pub fn reshape(corpus: &Corpus, abbreviations: &IndexMap<String, String>) -> OrderedCorpus {
    let books = corpus
        .books
        .iter()
        .map(|(name, book)| OrderedBook {
            name: name.clone(),
            abbr: abbreviations.get(name).cloned().unwrap_or_default(),
            chapters: book
                .chapters
                .iter()
                .map(|(number, verses)| OrderedChapter {
                    chapter: *number,
                    verses: verses.values().cloned().collect(),
                })
                .collect(),
        })
        .collect();
    OrderedCorpus { books }
}

/// `bible export`
///
/// If `output` is `None`, writes to the configured export path.
pub fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let corpus = store::load_corpus(&config.data.corpus)?;
    let ordered = reshape(&corpus, &config.export.abbreviations);
    let path = output.unwrap_or(&config.data.export);

    store::write_json(path, &ordered)?;
    println!("Wrote {} with {} books", path.display(), ordered.books.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verse;

    fn add(corpus: &mut Corpus, book: &str, chapter: u32, verse: u32, text: &str) {
        corpus.insert_verse(Verse {
            book: book.to_string(),
            chapter,
            verse,
            text: text.to_string(),
        });
    }

    #[test]
    fn test_reshape_orders_numerically() {
        let mut corpus = Corpus::new();
        add(&mut corpus, "詩篇", 10, 2, "10:2");
        add(&mut corpus, "詩篇", 2, 10, "2:10");
        add(&mut corpus, "詩篇", 2, 9, "2:9");
        add(&mut corpus, "詩篇", 10, 1, "10:1");

        let ordered = reshape(&corpus, &IndexMap::new());
        let book = &ordered.books[0];
        assert_eq!(book.name, "詩篇");
        assert_eq!(book.abbr, "");
        let chapters: Vec<u32> = book.chapters.iter().map(|c| c.chapter).collect();
        assert_eq!(chapters, vec![2, 10]);
        assert_eq!(book.chapters[0].verses, vec!["2:9", "2:10"]);
        assert_eq!(book.chapters[1].verses, vec!["10:1", "10:2"]);
    }

    #[test]
    fn test_reshape_fills_abbreviations_and_keeps_source() {
        let mut corpus = Corpus::new();
        add(&mut corpus, "創世記", 1, 1, "起初");
        add(&mut corpus, "出埃及記", 1, 1, "以色列");
        let before = corpus.clone();

        let mut abbrs = IndexMap::new();
        abbrs.insert("創世記".to_string(), "Gen".to_string());
        let ordered = reshape(&corpus, &abbrs);

        assert_eq!(ordered.books[0].abbr, "Gen");
        assert_eq!(ordered.books[1].name, "出埃及記");
        assert_eq!(ordered.books[1].abbr, "");
        assert_eq!(corpus, before);
    }

    #[test]
    fn test_export_json_shape() {
        let mut corpus = Corpus::new();
        add(&mut corpus, "創世記", 1, 1, "起初");
        let json = serde_json::to_value(reshape(&corpus, &IndexMap::new())).unwrap();
        assert_eq!(json["books"][0]["chapters"][0]["chapter"], 1);
        assert_eq!(json["books"][0]["chapters"][0]["verses"][0], "起初");
    }
}
