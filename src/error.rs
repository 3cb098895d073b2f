//! Lookup outcomes reported to the user without aborting.

use thiserror::Error;

/// A query or navigation request that could not be satisfied.
///
/// These travel inside `anyhow::Error`; frontends recover them with
/// `downcast_ref::<QueryError>()` and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("book not found: {0}")]
    BookNotFound(String),

    #[error("chapter {chapter} not found in {book}")]
    ChapterNotFound { book: String, chapter: u32 },

    #[error("no active book; use `read <book> <chapter>` first")]
    NoActiveBook,

    #[error("already at first chapter")]
    AlreadyAtFirstChapter,
}

/// Returns the [`QueryError`] carried by `err`, if any.
pub fn as_query_error(err: &anyhow::Error) -> Option<&QueryError> {
    err.downcast_ref::<QueryError>()
}
