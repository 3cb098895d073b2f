//! Corpus statistics.
//!
//! A quick summary of what the normalized corpus holds: totals plus a
//! per-book breakdown. Used by `bible stats` to confirm that parsing and
//! cleaning produced what was expected.

use anyhow::Result;

use crate::config::Config;
use crate::models::Corpus;
use crate::store;

/// Per-book row of the stats table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStats {
    pub name: String,
    pub chapters: usize,
    pub verses: usize,
}

/// Collect per-book counts in corpus order.
pub fn book_stats(corpus: &Corpus) -> Vec<BookStats> {
    corpus
        .books
        .iter()
        .map(|(name, book)| BookStats {
            name: name.clone(),
            chapters: book.chapters.len(),
            verses: book.chapters.values().map(|c| c.len()).sum(),
        })
        .collect()
}

/// Run the stats command: load the corpus and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let corpus = store::load_corpus(&config.data.corpus)?;
    let size = std::fs::metadata(&config.data.corpus)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Bible corpus stats");
    println!("==================");
    println!();
    println!("  Corpus:      {}", config.data.corpus.display());
    println!("  Size:        {}", format_bytes(size));
    println!();
    println!("  Books:       {}", corpus.books.len());
    println!("  Chapters:    {}", corpus.total_chapters());
    println!("  Verses:      {}", corpus.total_verses());
    if !corpus.abbr_map.is_empty() {
        println!("  Codes:       {}", corpus.abbr_map.len());
    }

    let rows = book_stats(&corpus);
    if !rows.is_empty() {
        println!();
        println!("  By book:");
        println!("  {:<24} {:>8} {:>8}", "BOOK", "CHAPTERS", "VERSES");
        println!("  {}", "-".repeat(42));
        for row in &rows {
            println!("  {:<24} {:>8} {:>8}", row.name, row.chapters, row.verses);
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verse;

    #[test]
    fn test_book_stats_in_corpus_order() {
        let mut corpus = Corpus::new();
        for (book, chapter, verse) in [("馬太福音", 1, 1), ("創世記", 1, 1), ("創世記", 1, 2), ("創世記", 2, 1)] {
            corpus.insert_verse(Verse {
                book: book.to_string(),
                chapter,
                verse,
                text: "。".to_string(),
            });
        }
        let rows = book_stats(&corpus);
        assert_eq!(rows[0].name, "馬太福音");
        assert_eq!(
            rows[1],
            BookStats {
                name: "創世記".to_string(),
                chapters: 2,
                verses: 3
            }
        );
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
