//! Pacing-based presentation.
//!
//! [`format_verse`] is a pure function of `(text, speed)`. Blank-line
//! grouping belongs to the loops that print several verses
//! ([`render_chapter`]), not to the per-verse formatter.

use std::io::{self, Write};

use crate::get::ChapterView;
use crate::models::Speed;
use crate::search::SearchOutcome;

/// Inserted after pauses in slow mode.
pub const PAUSE_MARKER: &str = "（短停）";

const FULL_STOP: char = '。';
const PAUSE_COMMA: char = '、';

/// Format one verse for `speed`.
///
/// Slow mode adds a pause marker and a line break after every full stop, and
/// a pause marker after every enumeration comma. Mid and fast pass the text
/// through.
pub fn format_verse(text: &str, speed: Speed) -> String {
    match speed {
        Speed::Slow => {
            let mut out = String::with_capacity(text.len() + 16);
            for c in text.chars() {
                out.push(c);
                match c {
                    FULL_STOP => {
                        out.push_str(PAUSE_MARKER);
                        out.push('\n');
                    }
                    PAUSE_COMMA => out.push_str(PAUSE_MARKER),
                    _ => {}
                }
            }
            out
        }
        Speed::Mid | Speed::Fast => text.to_string(),
    }
}

/// True when a blank line follows the `position`-th rendered verse (1-based).
pub fn breaks_after(speed: Speed, position: usize) -> bool {
    match speed.group_size() {
        Some(n) => position > 0 && position % n == 0,
        None => false,
    }
}

/// Print a fetched chapter with title, grouped verses and a footer.
pub fn render_chapter<W: Write>(out: &mut W, view: &ChapterView) -> io::Result<()> {
    writeln!(
        out,
        "【{} 第{}章】  (speed={})",
        view.book, view.chapter, view.speed
    )?;
    for (i, (number, text)) in view.verses.iter().enumerate() {
        writeln!(out, "{} {}", number, text)?;
        if breaks_after(view.speed, i + 1) {
            writeln!(out)?;
        }
    }
    writeln!(out)?;
    writeln!(
        out,
        "Total verses: {}. Estimated reading time at {} pace: {}",
        view.total,
        view.speed,
        format_duration(view.total as u64 * view.speed.seconds_per_verse())
    )?;
    Ok(())
}

/// Print search results, one line per hit.
pub fn render_search<W: Write>(out: &mut W, outcome: &SearchOutcome) -> io::Result<()> {
    writeln!(
        out,
        "Search: {} — {} verses found (showing top {})",
        outcome.query,
        outcome.total,
        outcome.hits.len()
    )?;
    for (i, hit) in outcome.hits.iter().enumerate() {
        writeln!(
            out,
            "{}. {} {}:{} ({}) {}",
            i + 1,
            hit.book,
            hit.chapter,
            hit.verse,
            hit.score,
            hit.text
        )?;
    }
    Ok(())
}

/// Format seconds as `1h 2m 3s`, dropping leading zero units.
pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_inserts_pauses() {
        assert_eq!(
            format_verse("起初。神創造天地。", Speed::Slow),
            "起初。（短停）\n神創造天地。（短停）\n"
        );
        assert_eq!(
            format_verse("金、銀、銅", Speed::Slow),
            "金、（短停）銀、（短停）銅"
        );
    }

    #[test]
    fn test_mid_and_fast_pass_through() {
        let text = "起初。神創造天地、海。";
        assert_eq!(format_verse(text, Speed::Mid), text);
        assert_eq!(format_verse(text, Speed::Fast), text);
    }

    #[test]
    fn test_grouping_positions() {
        assert!(!breaks_after(Speed::Slow, 3));
        assert!(breaks_after(Speed::Slow, 4));
        assert!(breaks_after(Speed::Slow, 8));
        assert!(!breaks_after(Speed::Fast, 4));
        assert!(breaks_after(Speed::Fast, 10));
        assert!((1..=40).all(|i| !breaks_after(Speed::Mid, i)));
    }

    #[test]
    fn test_render_chapter_fast_groups_every_ten() {
        let view = ChapterView {
            book: "詩篇".to_string(),
            chapter: 119,
            speed: Speed::Fast,
            verses: (1..=12).map(|n| (n, format!("v{}", n))).collect(),
            total: 12,
        };
        let mut buf = Vec::new();
        render_chapter(&mut buf, &view).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("【詩篇 第119章】"));
        assert!(text.contains("10 v10\n\n11 v11\n"));
        assert!(text.contains("9 v9\n10 v10"));
        assert!(text.contains("Total verses: 12"));
        assert!(text.contains("24s"));
    }

    #[test]
    fn test_render_chapter_slow_groups_every_four() {
        let view = ChapterView {
            book: "創世記".to_string(),
            chapter: 1,
            speed: Speed::Slow,
            verses: (1..=9).map(|n| (n, format!("v{}", n))).collect(),
            total: 9,
        };
        let mut buf = Vec::new();
        render_chapter(&mut buf, &view).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("(speed=slow)"));
        assert!(text.contains("3 v3\n4 v4\n\n5 v5\n"));
        assert!(text.contains("7 v7\n8 v8\n\n9 v9\n"));
        assert!(!text.contains("4 v4\n\n\n"));
        assert!(text.contains("1m 30s"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(310), "5m 10s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
    }
}
