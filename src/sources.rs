use anyhow::Result;

use crate::config::Config;
use crate::connector_fs;

pub fn list_sources(config: &Config) -> Result<()> {
    // Line-oriented source
    let lines = &config.sources.lines;
    let lines_status = if lines.is_file() { "OK" } else { "MISSING" };

    // HTML directory
    let html_dir = &config.sources.html_dir;
    let (html_status, html_docs) = if html_dir.is_dir() {
        ("OK", connector_fs::count_html_documents(&config.sources, html_dir)?)
    } else {
        ("MISSING", 0)
    };

    println!("{:<8} {:<10} {:>6}  PATH", "SOURCE", "STATUS", "DOCS");
    println!(
        "{:<8} {:<10} {:>6}  {}",
        "lines",
        lines_status,
        if lines.is_file() { "1" } else { "-" },
        lines.display()
    );
    println!(
        "{:<8} {:<10} {:>6}  {}",
        "html",
        html_status,
        html_docs,
        html_dir.display()
    );

    Ok(())
}
