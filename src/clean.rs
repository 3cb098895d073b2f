//! Destructive corpus cleanup.
//!
//! Removes books that have no chapters (front matter, table-of-contents
//! pages, headings without verses). The pre-filter corpus is always written
//! to the backup path before the corpus file is touched.

use anyhow::Result;

use crate::config::Config;
use crate::models::Corpus;
use crate::store;

/// Remove every book with an empty `chapters` map.
///
/// Returns the removed book names in corpus order.
pub fn remove_empty_books(corpus: &mut Corpus) -> Vec<String> {
    let removed: Vec<String> = corpus
        .books
        .iter()
        .filter(|(_, book)| book.chapters.is_empty())
        .map(|(name, _)| name.clone())
        .collect();
    corpus.books.retain(|_, book| !book.chapters.is_empty());
    removed
}

/// `bible clean`
pub fn run_clean(config: &Config) -> Result<()> {
    let mut corpus = store::load_corpus(&config.data.corpus)?;

    store::save_corpus(&config.data.backup, &corpus)?;
    eprintln!("Backup written to {}", config.data.backup.display());

    let removed = remove_empty_books(&mut corpus);
    store::save_corpus(&config.data.corpus, &corpus)?;

    tracing::info!(removed = removed.len(), remaining = corpus.books.len(), "corpus cleaned");
    println!("Removed entries: {:?}", removed);
    println!("Remaining books: {}", corpus.books.len());
    Ok(())
}
