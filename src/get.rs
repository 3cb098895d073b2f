//! Chapter retrieval.
//!
//! Looks up one chapter of one book and returns its verses in ascending
//! order, already formatted for the requested pacing mode. Used by
//! `bible query --chapter` and by the reader's navigation commands.

use anyhow::Result;

use crate::config::Config;
use crate::error::{as_query_error, QueryError};
use crate::format::{self, format_verse};
use crate::models::{Corpus, Speed};
use crate::navigate::Navigator;
use crate::session::JsonSessionStore;
use crate::store;

/// A chapter ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterView {
    pub book: String,
    pub chapter: u32,
    pub speed: Speed,
    /// `(verse number, formatted text)`, ascending by verse.
    pub verses: Vec<(u32, String)>,
    pub total: usize,
}

/// Core lookup. The book name must match exactly.
pub fn fetch_chapter(
    corpus: &Corpus,
    book: &str,
    chapter: u32,
    speed: Speed,
) -> Result<ChapterView, QueryError> {
    let found = corpus
        .book(book)
        .ok_or_else(|| QueryError::BookNotFound(book.to_string()))?;
    let verses = found
        .chapter(chapter)
        .ok_or_else(|| QueryError::ChapterNotFound {
            book: book.to_string(),
            chapter,
        })?;

    let verses: Vec<(u32, String)> = verses
        .iter()
        .map(|(number, text)| (*number, format_verse(text, speed)))
        .collect();

    Ok(ChapterView {
        book: book.to_string(),
        chapter,
        speed,
        total: verses.len(),
        verses,
    })
}

/// Split `"<book> <chapter>"` on its last whitespace. The book part may
/// itself contain spaces.
pub fn parse_chapter_ref(reference: &str) -> Option<(String, u32)> {
    let (book, chapter) = reference.trim().rsplit_once(char::is_whitespace)?;
    let book = book.trim();
    let chapter = chapter.parse::<u32>().ok().filter(|n| *n > 0)?;
    if book.is_empty() {
        return None;
    }
    Some((book.to_string(), chapter))
}

/// CLI entry point for `bible query --chapter`.
pub fn run_chapter(config: &Config, reference: &str, speed: Speed) -> Result<()> {
    let Some((book, chapter)) = parse_chapter_ref(reference) else {
        println!(
            "Invalid chapter reference '{}'; use \"<book> <chapter>\", e.g. \"創世記 1\"",
            reference
        );
        return Ok(());
    };

    let corpus = store::load_corpus(&config.data.corpus)?;
    let session_store = JsonSessionStore::new(&config.data.session);
    let mut nav = Navigator::new(&corpus, &session_store);

    match nav.fetch_chapter(&book, chapter, speed) {
        Ok(view) => {
            let stdout = std::io::stdout();
            format::render_chapter(&mut stdout.lock(), &view)?;
            Ok(())
        }
        Err(e) => match as_query_error(&e) {
            Some(miss) => {
                println!("{}", miss);
                Ok(())
            }
            None => Err(e),
        },
    }
}
