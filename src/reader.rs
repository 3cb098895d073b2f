//! Interactive reader.
//!
//! A line-command loop over a [`Navigator`]. Input and output are generic so
//! the loop can be driven from a terminal, a pipe, or a test buffer.
//!
//! ```text
//! read <book> <chapter>   read a chapter
//! next | prev | restart   move within the current book
//! speed <slow|mid|fast>   change pacing
//! search <query>          keyword search (AND / OR)
//! status                  show the current position
//! help | exit | quit
//! ```

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::config::Config;
use crate::error::{as_query_error, QueryError};
use crate::format;
use crate::get::ChapterView;
use crate::models::Speed;
use crate::navigate::Navigator;
use crate::session::{JsonSessionStore, SessionStore};
use crate::store;

const HELP: &str = "\
Commands:
  read <book> <chapter>   read a chapter, e.g. `read 創世記 1`
  next                    next chapter of the current book
  prev                    previous chapter of the current book
  restart                 chapter 1 of the current book
  speed <slow|mid|fast>   change pacing
  search <query>          keyword search; join terms with OR / AND
  status                  show current book, chapter and speed
  help                    show this help
  exit | quit             leave the reader";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Read { book: String, chapter: u32 },
    Next,
    Prev,
    Restart,
    Speed(Speed),
    Search(String),
    Status,
    Help,
    Exit,
}

impl Command {
    /// Parse one input line. `Ok(None)` means a blank line; `Err` carries a
    /// usage hint for the user.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        let Some(word) = line.split_whitespace().next() else {
            return Ok(None);
        };
        let args = line[word.len()..].trim();

        let cmd = match word.to_lowercase().as_str() {
            "read" => {
                let parts: Vec<&str> = args.split_whitespace().collect();
                let usage = || "usage: read <book> <chapter>".to_string();
                if parts.len() < 2 {
                    return Err(usage());
                }
                let chapter = parts[parts.len() - 1]
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(usage)?;
                Command::Read {
                    book: parts[..parts.len() - 1].join(" "),
                    chapter,
                }
            }
            "next" => Command::Next,
            "prev" => Command::Prev,
            "restart" => Command::Restart,
            "speed" => {
                if args.is_empty() {
                    return Err("usage: speed <slow|mid|fast>".to_string());
                }
                Command::Speed(args.parse::<Speed>()?)
            }
            "search" => {
                if args.is_empty() {
                    return Err("usage: search <query>".to_string());
                }
                Command::Search(args.to_string())
            }
            "status" => Command::Status,
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => return Err("unknown command; type `help` for usage".to_string()),
        };
        Ok(Some(cmd))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Show the banner and prompt (stdin is a terminal).
    pub interactive: bool,
    /// Maximum search hits to print.
    pub top: usize,
}

/// Run the command loop until `exit`/`quit` or end of input.
pub fn run_reader<S, R, W>(
    nav: &mut Navigator<'_, S>,
    mut input: R,
    out: &mut W,
    options: ReaderOptions,
) -> Result<()>
where
    S: SessionStore + ?Sized,
    R: BufRead,
    W: Write,
{
    if options.interactive {
        writeln!(out, "Bible reader. Type `help` for commands.")?;
    }

    let mut line = String::new();
    loop {
        if options.interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            if options.interactive {
                writeln!(out)?;
            }
            break;
        }

        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(usage) => {
                writeln!(out, "{}", usage)?;
                continue;
            }
        };

        match cmd {
            Command::Read { book, chapter } => {
                let speed = nav.session().speed;
                show_chapter(out, nav.fetch_chapter(&book, chapter, speed))?;
            }
            Command::Next => show_chapter(out, nav.next_chapter())?,
            Command::Prev => show_chapter(out, nav.prev_chapter())?,
            Command::Restart => show_chapter(out, nav.restart())?,
            Command::Speed(speed) => {
                nav.set_speed(speed)?;
                writeln!(out, "Speed set to {}", speed)?;
            }
            Command::Search(query) => {
                let speed = nav.session().speed;
                let outcome = nav.search(&query, speed, options.top)?;
                if outcome.total == 0 {
                    writeln!(out, "No results.")?;
                } else {
                    format::render_search(out, &outcome)?;
                }
            }
            Command::Status => {
                let session = nav.session();
                match (&session.book, session.chapter) {
                    (Some(book), Some(chapter)) => {
                        writeln!(out, "Reading {} {} at {} pace", book, chapter, session.speed)?
                    }
                    _ => writeln!(out, "No active book (speed: {})", session.speed)?,
                }
                if let Some(ref q) = session.last_search {
                    writeln!(out, "Last search: {}", q)?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Exit => break,
        }
    }

    Ok(())
}

/// `bible read`: the reader over stdin/stdout with the on-disk session.
pub fn run_read(config: &Config) -> Result<()> {
    let corpus = store::load_corpus(&config.data.corpus)?;
    let session_store = JsonSessionStore::new(&config.data.session);
    let mut nav = Navigator::new(&corpus, &session_store);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let options = ReaderOptions {
        interactive: atty::is(atty::Stream::Stdin),
        top: config.query.top,
    };
    run_reader(&mut nav, stdin.lock(), &mut stdout.lock(), options)
}

fn show_chapter<W: Write>(out: &mut W, result: Result<ChapterView>) -> Result<()> {
    match result {
        Ok(view) => format::render_chapter(out, &view)?,
        Err(e) => match as_query_error(&e) {
            Some(miss @ QueryError::ChapterNotFound { .. }) => {
                writeln!(out, "{} (end of book?)", miss)?
            }
            Some(miss) => writeln!(out, "{}", miss)?,
            None => return Err(e),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Corpus, Verse};
    use crate::session::MemorySessionStore;

    fn corpus() -> Corpus {
        let mut corpus = Corpus::new();
        for (book, chapter, verse, text) in [
            ("創世記", 1, 1, "起初。神創造天地。"),
            ("創世記", 2, 1, "天地萬物都造齊了。"),
            ("約翰福音", 3, 16, "神愛世人。"),
        ] {
            corpus.insert_verse(Verse {
                book: book.to_string(),
                chapter,
                verse,
                text: text.to_string(),
            });
        }
        corpus.refresh_counts();
        corpus
    }

    fn run(script: &str, store: &MemorySessionStore) -> String {
        let corpus = corpus();
        let mut nav = Navigator::new(&corpus, store);
        let mut out = Vec::new();
        run_reader(
            &mut nav,
            script.as_bytes(),
            &mut out,
            ReaderOptions {
                interactive: false,
                top: 10,
            },
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("read 創世記 1"),
            Ok(Some(Command::Read {
                book: "創世記".to_string(),
                chapter: 1
            }))
        );
        assert_eq!(
            Command::parse("READ Song of Songs 2"),
            Ok(Some(Command::Read {
                book: "Song of Songs".to_string(),
                chapter: 2
            }))
        );
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(Command::parse("speed fast"), Ok(Some(Command::Speed(Speed::Fast))));
        assert_eq!(Command::parse("quit"), Ok(Some(Command::Exit)));
        assert_eq!(
            Command::parse("search 信 OR 愛"),
            Ok(Some(Command::Search("信 OR 愛".to_string())))
        );
        assert!(Command::parse("read 創世記").is_err());
        assert!(Command::parse("read 創世記 x").is_err());
        assert!(Command::parse("speed warp").is_err());
        assert!(Command::parse("jump").is_err());
    }

    #[test]
    fn test_session_flow() {
        let store = MemorySessionStore::new();
        let out = run("read 創世記 1\nnext\nnext\nprev\nspeed slow\nrestart\nexit\nread 約翰福音 3\n", &store);

        assert!(out.contains("【創世記 第1章】"));
        assert!(out.contains("【創世記 第2章】"));
        assert!(out.contains("chapter 3 not found in 創世記 (end of book?)"));
        assert!(out.contains("Speed set to slow"));
        assert!(out.contains("1 起初。（短停）\n神創造天地。（短停）\n"));
        assert!(!out.contains("約翰福音"));

        let saved = store.saved().unwrap();
        assert_eq!(saved.book.as_deref(), Some("創世記"));
        assert_eq!(saved.chapter, Some(1));
        assert_eq!(saved.speed, Speed::Slow);
    }

    #[test]
    fn test_misses_are_reported_and_loop_continues() {
        let store = MemorySessionStore::new();
        let out = run("next\nread 啟示錄 1\nbogus\nread 創世記 1\nprev\n", &store);
        assert!(out.contains("no active book"));
        assert!(out.contains("book not found: 啟示錄"));
        assert!(out.contains("unknown command"));
        assert!(out.contains("already at first chapter"));
        assert_eq!(store.saved().unwrap().chapter, Some(1));
    }

    #[test]
    fn test_search_and_status() {
        let store = MemorySessionStore::new();
        let out = run("search 神 OR 天地\nstatus\nsearch 無此字\n", &store);
        assert!(out.contains("3 verses found"));
        assert!(out.contains("1. 創世記 1:1 (2)"));
        assert!(out.contains("No active book"));
        assert!(out.contains("Last search: 神 OR 天地"));
        assert!(out.contains("No results."));
        assert_eq!(store.saved().unwrap().last_search.as_deref(), Some("無此字"));
    }
}
