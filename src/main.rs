//! # Bible Reader CLI (`bible`)
//!
//! The `bible` binary builds the normalized corpus from raw sources and
//! reads or searches it.
//!
//! ## Usage
//!
//! ```bash
//! bible --config ./config/bible.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bible parse lines` | Build the corpus from a line-oriented text file |
//! | `bible parse html` | Build the corpus from a directory of per-book HTML files |
//! | `bible clean` | Back up the corpus, then remove books without chapters |
//! | `bible export` | Write the ordered export format |
//! | `bible query --chapter "<book> <chapter>"` | Print one chapter |
//! | `bible query --search "<query>"` | Keyword search with AND / OR |
//! | `bible read` | Interactive reader |
//! | `bible stats` | Corpus summary |
//! | `bible sources` | Configured sources and their status |
//!
//! ## Examples
//!
//! ```bash
//! bible parse lines --input cut/books.txt
//! bible query --chapter "約翰福音 3" --speed fast
//! bible query --search "信 OR 愛" --top 5
//! ```

use bible_reader::models::Speed;
use bible_reader::{clean, config, export, get, ingest, reader, search, sources, stats};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bible Reader: build, clean, export, query and read a scripture corpus.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. Without one, built-in defaults under `data/` and `cut/` are used.
#[derive(Parser)]
#[command(
    name = "bible",
    about = "Build, clean, export, query and read a Chinese Union Version corpus",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/bible.toml`. If the file does not exist the
    /// built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/bible.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the normalized corpus from a raw source.
    Parse {
        #[command(subcommand)]
        source: ParseSource,
    },

    /// Remove books without chapters.
    ///
    /// Writes the current corpus to the backup path first, then rewrites the
    /// corpus without the empty books.
    Clean,

    /// Write the ordered export format.
    Export {
        /// Output path. Defaults to `[data].export`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print a chapter or search the corpus.
    ///
    /// Exactly one of `--chapter` or `--search` is required. Both update the
    /// session file.
    #[command(group(ArgGroup::new("mode").required(true).args(["chapter", "search"])))]
    Query {
        /// Chapter reference, e.g. `"創世記 1"`.
        #[arg(long)]
        chapter: Option<String>,

        /// Search query. Join terms with ` OR ` or ` AND `.
        #[arg(long)]
        search: Option<String>,

        /// Pacing mode. Defaults to `[query].default_speed`.
        #[arg(long, value_enum)]
        speed: Option<Speed>,

        /// Maximum number of search results. Defaults to `[query].top`.
        #[arg(long)]
        top: Option<usize>,
    },

    /// Start the interactive reader.
    ///
    /// Reads commands from stdin until `exit`, `quit` or end of input.
    Read,

    /// Show corpus statistics.
    Stats,

    /// List configured sources and their status.
    Sources,
}

/// Raw source kinds.
#[derive(Subcommand)]
enum ParseSource {
    /// Parse a line-oriented text file (`GEN 1:1 創世記 1:1 text`).
    Lines {
        /// Input file. Defaults to `[sources].lines`.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output corpus. Defaults to `[data].corpus`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse a directory of per-book HTML documents.
    Html {
        /// Input directory. Defaults to `[sources].html_dir`.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output corpus. Defaults to `[data].corpus`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config_or_minimal(&cli.config)?;

    match cli.command {
        Commands::Parse { source } => match source {
            ParseSource::Lines { input, output } => {
                ingest::run_parse_lines(&cfg, input.as_deref(), output.as_deref())?;
            }
            ParseSource::Html { dir, output } => {
                ingest::run_parse_html(&cfg, dir.as_deref(), output.as_deref())?;
            }
        },
        Commands::Clean => {
            clean::run_clean(&cfg)?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref())?;
        }
        Commands::Query {
            chapter,
            search,
            speed,
            top,
        } => {
            let speed = speed.unwrap_or(cfg.query.default_speed);
            if let Some(reference) = chapter {
                get::run_chapter(&cfg, &reference, speed)?;
            } else if let Some(query) = search {
                search::run_search(&cfg, &query, speed, top)?;
            }
        }
        Commands::Read => {
            reader::run_read(&cfg)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
    }

    Ok(())
}
