//! Keyword search with AND/OR semantics.
//!
//! # Scoring
//!
//! 1. Split the query on ` OR ` (or else ` AND `), case-insensitively.
//! 2. Score each verse by how many listed terms occur in it as substrings.
//! 3. OR keeps verses with score ≥ 1; AND keeps verses matching every term.
//! 4. Sort by score (desc), book name (asc), chapter (asc), verse (asc).
//! 5. Truncate to `top`; the total match count is kept.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use crate::config::Config;
use crate::format::{self, format_verse};
use crate::models::{Corpus, Speed};
use crate::navigate::Navigator;
use crate::session::JsonSessionStore;
use crate::store;

static OR_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+OR\s+").unwrap());
static AND_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+AND\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Or,
    And,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub mode: MatchMode,
    pub terms: Vec<String>,
}

/// Split a query into terms. Without a delimiter the whole query is one OR
/// term. Empty terms are dropped.
pub fn parse_query(query: &str) -> ParsedQuery {
    let q = query.trim();
    let upper = q.to_uppercase();

    let (mode, pieces): (MatchMode, Vec<&str>) = if upper.contains(" OR ") {
        (MatchMode::Or, OR_SPLIT_RE.split(q).collect())
    } else if upper.contains(" AND ") {
        (MatchMode::And, AND_SPLIT_RE.split(q).collect())
    } else {
        (MatchMode::Or, vec![q])
    };

    let terms = pieces
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    ParsedQuery { mode, terms }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub score: usize,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    /// Verse text formatted for the requested speed.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    pub mode: MatchMode,
    /// Number of matching verses before truncation.
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

/// Number of `terms` that occur in `text`, one count per listed term.
pub fn score_text(text: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| text.contains(t.as_str())).count()
}

/// Run a linear search over the whole corpus.
pub fn search_corpus(corpus: &Corpus, query: &str, speed: Speed, top: usize) -> SearchOutcome {
    let parsed = parse_query(query);

    // (score, book, chapter, verse, raw text)
    let mut matches: Vec<(usize, &str, u32, u32, &str)> = Vec::new();
    if !parsed.terms.is_empty() {
        for (book, data) in &corpus.books {
            for (chapter, verses) in &data.chapters {
                for (verse, text) in verses {
                    let score = score_text(text, &parsed.terms);
                    let keep = match parsed.mode {
                        MatchMode::Or => score >= 1,
                        MatchMode::And => score == parsed.terms.len(),
                    };
                    if keep {
                        matches.push((score, book.as_str(), *chapter, *verse, text.as_str()));
                    }
                }
            }
        }
    }

    matches.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.cmp(b.1))
            .then(a.2.cmp(&b.2))
            .then(a.3.cmp(&b.3))
    });

    let total = matches.len();
    let hits = matches
        .into_iter()
        .take(top)
        .map(|(score, book, chapter, verse, text)| SearchHit {
            score,
            book: book.to_string(),
            chapter,
            verse,
            text: format_verse(text, speed),
        })
        .collect();

    SearchOutcome {
        query: query.to_string(),
        mode: parsed.mode,
        total,
        hits,
    }
}

/// CLI entry point for `bible query --search`.
pub fn run_search(config: &Config, query: &str, speed: Speed, top: Option<usize>) -> Result<()> {
    let corpus = store::load_corpus(&config.data.corpus)?;
    let session_store = JsonSessionStore::new(&config.data.session);
    let mut nav = Navigator::new(&corpus, &session_store);

    let outcome = nav.search(query, speed, top.unwrap_or(config.query.top))?;
    if outcome.total == 0 {
        println!("No results.");
        return Ok(());
    }

    let stdout = std::io::stdout();
    format::render_search(&mut stdout.lock(), &outcome)?;
    Ok(())
}
