//! # Bible Reader
//!
//! A toolkit for turning raw Chinese Union Version scripture sources into a
//! normalized JSON corpus, and for reading and searching that corpus from
//! the command line.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │   Sources    │──▶│  Extractor  │──▶│    Corpus    │
//! │ lines / HTML │   │ + Builder   │   │  bible.json  │
//! └──────────────┘   └─────────────┘   └──────┬───────┘
//!                                             │
//!                      ┌──────────────┬───────┴──────┐
//!                      ▼              ▼              ▼
//!                 ┌─────────┐   ┌───────────┐   ┌──────────┐
//!                 │  clean  │   │  export   │   │  query / │
//!                 │ +backup │   │ (ordered) │   │  reader  │
//!                 └─────────┘   └───────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! bible parse lines --input cut/books.txt   # build data/bible.json
//! bible clean                               # drop books without chapters
//! bible query --chapter "創世記 1" --speed slow
//! bible query --search "信 AND 愛"
//! bible read                                # interactive reader
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Corpus, verse, session and speed types |
//! | [`error`] | Lookup outcomes reported to the user |
//! | [`connector_fs`] | Reading line and HTML sources from disk |
//! | [`extract`] | Verse extraction from lines and HTML |
//! | [`ingest`] | Folding verses into a corpus |
//! | [`store`] | JSON persistence |
//! | [`clean`] | Empty-book removal with backup |
//! | [`export`] | Ordered export format |
//! | [`get`] | Chapter lookup |
//! | [`search`] | AND/OR keyword search |
//! | [`format`] | Pacing-based presentation |
//! | [`session`] | Session persistence |
//! | [`navigate`] | Session-aware query operations |
//! | [`reader`] | Interactive reader loop |
//! | [`stats`] | Corpus summary |
//! | [`sources`] | Source status listing |

pub mod clean;
pub mod config;
pub mod connector_fs;
pub mod error;
pub mod export;
pub mod extract;
pub mod format;
pub mod get;
pub mod ingest;
pub mod models;
pub mod navigate;
pub mod reader;
pub mod search;
pub mod session;
pub mod sources;
pub mod stats;
pub mod store;
