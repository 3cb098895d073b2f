//! Session-aware query operations.
//!
//! [`Navigator`] owns the current [`Session`] record and persists it through
//! a [`SessionStore`] after every successful operation. Failed lookups leave
//! both the in-memory record and the stored session untouched.

use anyhow::Result;

use crate::error::QueryError;
use crate::get::{self, ChapterView};
use crate::models::{Corpus, Session, Speed};
use crate::search::{self, SearchOutcome};
use crate::session::SessionStore;

pub struct Navigator<'a, S: SessionStore + ?Sized> {
    corpus: &'a Corpus,
    store: &'a S,
    session: Session,
}

impl<'a, S: SessionStore + ?Sized> Navigator<'a, S> {
    /// Load the stored session and start navigating `corpus`.
    pub fn new(corpus: &'a Corpus, store: &'a S) -> Self {
        let session = store.load();
        Self {
            corpus,
            store,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn corpus(&self) -> &Corpus {
        self.corpus
    }

    /// Fetch a chapter and make it the current position.
    pub fn fetch_chapter(&mut self, book: &str, chapter: u32, speed: Speed) -> Result<ChapterView> {
        let view = get::fetch_chapter(self.corpus, book, chapter, speed)?;
        self.session.book = Some(book.to_string());
        self.session.chapter = Some(chapter);
        self.session.speed = speed;
        self.persist()?;
        Ok(view)
    }

    /// Search the corpus and remember the query.
    pub fn search(&mut self, query: &str, speed: Speed, top: usize) -> Result<SearchOutcome> {
        let outcome = search::search_corpus(self.corpus, query, speed, top);
        self.session.last_search = Some(query.to_string());
        self.session.speed = speed;
        self.persist()?;
        Ok(outcome)
    }

    pub fn next_chapter(&mut self) -> Result<ChapterView> {
        let (book, chapter) = self.position()?;
        let next = chapter
            .checked_add(1)
            .ok_or_else(|| QueryError::ChapterNotFound {
                book: book.clone(),
                chapter,
            })?;
        self.fetch_chapter(&book, next, self.session.speed)
    }

    /// Step back one chapter; refuses to go below chapter 1.
    pub fn prev_chapter(&mut self) -> Result<ChapterView> {
        let (book, chapter) = self.position()?;
        if chapter <= 1 {
            return Err(QueryError::AlreadyAtFirstChapter.into());
        }
        self.fetch_chapter(&book, chapter - 1, self.session.speed)
    }

    /// Go back to chapter 1 of the current book.
    pub fn restart(&mut self) -> Result<ChapterView> {
        let book = self
            .session
            .book
            .clone()
            .ok_or(QueryError::NoActiveBook)?;
        self.fetch_chapter(&book, 1, self.session.speed)
    }

    pub fn set_speed(&mut self, speed: Speed) -> Result<()> {
        self.session.speed = speed;
        self.persist()
    }

    fn position(&self) -> Result<(String, u32), QueryError> {
        match (&self.session.book, self.session.chapter) {
            (Some(book), Some(chapter)) => Ok((book.clone(), chapter)),
            _ => Err(QueryError::NoActiveBook),
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.session)
    }
}
