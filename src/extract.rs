//! Verse extraction from raw sources.
//!
//! Two source formats are supported, each with its own strategy but the same
//! output shape ([`Verse`]):
//!
//! - **Line source**: one candidate verse per line, `Ge 1:1 創世記 1:1 起初…`.
//!   [`LineExtractor`] also maintains the abbreviation map (`Ge` → `創世記`).
//! - **HTML source**: one document per book. [`extract_html`] reads the book
//!   name from the first heading and the verses from `c:v` caption markers.
//!
//! Both are built from ordered lists of pure try-parse functions; the first
//! function that returns `Some` wins. Lines or fragments that match nothing
//! are skipped, never fatal.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::models::Verse;

// ============ Patterns ============

/// `<code> <chapter>:<verse> <rest>`
static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{2,5})\s*(\d+):(\d+)\s+(.+)$").unwrap());

/// `<CJK name> <c:v> <text>` with whitespace on both sides of the pair.
static SPACED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\x{4e00}-\x{9fff}\x{3000}-\x{303f}]+)\s+(\d+:\d+)\s+(.+)$").unwrap()
});

/// `<CJK name><c:v><text>` where the whitespace is optional.
static COMPACT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\x{4e00}-\x{9fff}]+)\s*(\d+:\d+)\s*(.+)$").unwrap());

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]\s*>").unwrap());

static CJK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4e00}-\x{9fff}\x{3000}-\x{303f}]+").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// `<a …></a><small>c:v</small> text<br>`
static ANCHORED_CAPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<a\b[^>]*>\s*</a>\s*<small>\s*(\d+)\s*:\s*(\d+)\s*</small>\s*([^<]*?)<br\s*/?>",
    )
    .unwrap()
});

/// `<a name="001-c:v"></a> text<br>`, caption optional.
static ANCHOR_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<a\b[^>]*\bname\s*=\s*"[^"]*?(\d+):(\d+)"[^>]*>\s*</a>\s*(?:<small>[^<]*</small>)?\s*([^<]*?)<br\s*/?>"#,
    )
    .unwrap()
});

/// `<small>c:v</small> text<br>`
static PLAIN_CAPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<small>\s*(\d+)\s*:\s*(\d+)\s*</small>\s*([^<]*?)<br\s*/?>").unwrap()
});

// ============ Line source ============

/// Splits the remainder of a line into `(book name, verse text)`.
type NameSplitter = fn(&str) -> Option<(String, String)>;

const NAME_SPLITTERS: &[NameSplitter] = &[split_spaced_name, split_compact_name];

fn split_spaced_name(rest: &str) -> Option<(String, String)> {
    split_with(&SPACED_NAME_RE, rest)
}

fn split_compact_name(rest: &str) -> Option<(String, String)> {
    split_with(&COMPACT_NAME_RE, rest)
}

fn split_with(re: &Regex, rest: &str) -> Option<(String, String)> {
    let caps = re.captures(rest)?;
    let name = caps[1].trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, caps[3].trim().to_string()))
}

/// Line-oriented extractor carrying the abbreviation map across lines.
#[derive(Debug, Default)]
pub struct LineExtractor {
    abbr_map: IndexMap<String, String>,
}

impl LineExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line. Returns `None` for lines that are not verses.
    ///
    /// A CJK book name found after the reference is recorded for the line's
    /// code the first time the code is seen with a name; later names for the
    /// same code are ignored.
    pub fn extract_line(&mut self, line: &str) -> Option<Verse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let caps = LINE_RE.captures(line)?;
        let code = &caps[1];
        let chapter = parse_number(&caps[2])?;
        let verse = parse_number(&caps[3])?;
        let rest = &caps[4];

        let text = match NAME_SPLITTERS.iter().find_map(|split| split(rest)) {
            Some((name, text)) => {
                self.abbr_map.entry(code.to_string()).or_insert(name);
                text
            }
            None => rest.trim().to_string(),
        };

        if text.is_empty() {
            return None;
        }

        let book = self
            .abbr_map
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string());

        Some(Verse {
            book,
            chapter,
            verse,
            text,
        })
    }

    pub fn abbr_map(&self) -> &IndexMap<String, String> {
        &self.abbr_map
    }

    pub fn into_abbr_map(self) -> IndexMap<String, String> {
        self.abbr_map
    }
}

/// Extract every verse from a line-oriented document.
pub fn extract_lines(text: &str) -> (Vec<Verse>, IndexMap<String, String>) {
    let mut extractor = LineExtractor::new();
    let mut verses = Vec::new();
    for (n, line) in text.lines().enumerate() {
        match extractor.extract_line(line) {
            Some(v) => verses.push(v),
            None if !line.trim().is_empty() => {
                tracing::debug!(line = n + 1, "skipping line that is not a verse");
            }
            None => {}
        }
    }
    (verses, extractor.into_abbr_map())
}

// ============ HTML source ============

/// A verse marker found in an HTML document: `(chapter, verse, raw text)`.
type RawVerse = (u32, u32, String);

/// Returns `Some` only when the variant matched at least once.
type VerseStrategy = fn(&str) -> Option<Vec<RawVerse>>;

const VERSE_STRATEGIES: &[(&str, VerseStrategy)] = &[
    ("anchored-caption", anchored_caption),
    ("anchor-name", anchor_name),
    ("plain-caption", plain_caption),
];

fn anchored_caption(html: &str) -> Option<Vec<RawVerse>> {
    capture_all(&ANCHORED_CAPTION_RE, html)
}

fn anchor_name(html: &str) -> Option<Vec<RawVerse>> {
    capture_all(&ANCHOR_NAME_RE, html)
}

fn plain_caption(html: &str) -> Option<Vec<RawVerse>> {
    capture_all(&PLAIN_CAPTION_RE, html)
}

fn capture_all(re: &Regex, html: &str) -> Option<Vec<RawVerse>> {
    let mut matched = false;
    let mut out = Vec::new();
    for caps in re.captures_iter(html) {
        matched = true;
        if let Some(raw) = raw_verse(&caps) {
            out.push(raw);
        }
    }
    matched.then_some(out)
}

fn raw_verse(caps: &Captures<'_>) -> Option<RawVerse> {
    let chapter = parse_number(&caps[1])?;
    let verse = parse_number(&caps[2])?;
    Some((chapter, verse, caps[3].to_string()))
}

/// Book name for an HTML document.
///
/// Uses the first CJK run of the first heading, then the heading's plain
/// text, then `identifier` (usually the file stem).
pub fn html_book_name(html: &str, identifier: &str) -> String {
    let Some(caps) = HEADING_RE.captures(html) else {
        return identifier.to_string();
    };
    let heading = &caps[1];

    if let Some(run) = CJK_RUN_RE.find(heading) {
        let name = run.as_str().trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    let plain = clean_text(&TAG_RE.replace_all(heading, " "));
    if plain.is_empty() {
        identifier.to_string()
    } else {
        plain
    }
}

/// Extract the book name and every verse from one HTML document.
///
/// Marker variants are tried in order and the first one that matches
/// anything is used for the whole document.
pub fn extract_html(html: &str, identifier: &str) -> (String, Vec<Verse>) {
    let book = html_book_name(html, identifier);

    let Some((variant, raw)) = VERSE_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(html).map(|raw| (*name, raw)))
    else {
        tracing::debug!(document = identifier, "no verse markers found");
        return (book, Vec::new());
    };
    tracing::debug!(document = identifier, variant, matches = raw.len(), "verse markers");

    let verses = raw
        .into_iter()
        .filter_map(|(chapter, verse, text)| {
            let text = clean_text(&decode_entities(&text));
            if text.is_empty() {
                return None;
            }
            Some(Verse {
                book: book.clone(),
                chapter,
                verse,
                text,
            })
        })
        .collect();
    (book, verses)
}

// ============ Helpers ============

fn parse_number(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Collapse whitespace runs to one space and trim.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_with_cjk_name() {
        let mut ex = LineExtractor::new();
        let v = ex.extract_line("Ge 1:1 創世記 1:1 起初　神創造天地。").unwrap();
        assert_eq!(v.book, "創世記");
        assert_eq!(v.chapter, 1);
        assert_eq!(v.verse, 1);
        assert_eq!(v.text, "起初　神創造天地。");
        assert_eq!(ex.abbr_map().get("Ge").map(String::as_str), Some("創世記"));
    }

    #[test]
    fn test_line_compact_name() {
        let mut ex = LineExtractor::new();
        let v = ex.extract_line("Ex 2:3 出埃及記2:3不能再藏").unwrap();
        assert_eq!(v.book, "出埃及記");
        assert_eq!(v.text, "不能再藏");
    }

    #[test]
    fn test_line_without_name_uses_code() {
        let mut ex = LineExtractor::new();
        let v = ex.extract_line("Le 1:1 plain verse text").unwrap();
        assert_eq!(v.book, "Le");
        assert_eq!(v.text, "plain verse text");
        assert!(ex.abbr_map().is_empty());
    }

    #[test]
    fn test_mapped_code_is_reused_and_never_remapped() {
        let mut ex = LineExtractor::new();
        ex.extract_line("Ge 1:1 創世記 1:1 起初").unwrap();
        let later = ex.extract_line("Ge 1:2 創世紀 1:2 地是空虛混沌").unwrap();
        assert_eq!(later.book, "創世記");
        let bare = ex.extract_line("Ge 1:3 神說").unwrap();
        assert_eq!(bare.book, "創世記");
        assert_eq!(ex.abbr_map().len(), 1);
    }

    #[test]
    fn test_second_reference_does_not_override_numbers() {
        let mut ex = LineExtractor::new();
        let v = ex.extract_line("Ge 1:5 創世記 9:9 稱光為晝").unwrap();
        assert_eq!((v.chapter, v.verse), (1, 5));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let mut ex = LineExtractor::new();
        assert!(ex.extract_line("").is_none());
        assert!(ex.extract_line("Genesis 1:1 too long a code").is_none());
        assert!(ex.extract_line("G 1:1 too short").is_none());
        assert!(ex.extract_line("Ge one:1 not numeric").is_none());
        assert!(ex.extract_line("Ge 0:1 zero chapter").is_none());
        assert!(ex.extract_line("Ge 1:1").is_none());
    }

    #[test]
    fn test_extract_lines_collects_map() {
        let text = "header line\nGe 1:1 創世記 1:1 起初\n\nGe 1:2 地是空虛\nbad\n";
        let (verses, map) = extract_lines(text);
        assert_eq!(verses.len(), 2);
        assert!(verses.iter().all(|v| v.book == "創世記"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_html_book_name_from_heading() {
        let html = r#"<h3 align="center">001 創世記 Genesis</h3>"#;
        assert_eq!(html_book_name(html, "001"), "創世記");
    }

    #[test]
    fn test_html_book_name_fallbacks() {
        assert_eq!(html_book_name("<p>no heading</p>", "002-exodus"), "002-exodus");
        assert_eq!(html_book_name("<h2><b>Exodus</b></h2>", "002"), "Exodus");
        assert_eq!(html_book_name("<h2> </h2>", "002"), "002");
    }

    #[test]
    fn test_html_anchored_caption() {
        let html = r#"<h3>001 創世記</h3>
<a name="001-1:1"></a><small>1:1</small> 起初，
  神創造天地。<br>
<a name="001-1:2"></a><small>1:2</small>地是空虛混沌&nbsp;淵面黑暗<br/>"#;
        let (_, verses) = extract_html(html, "001");
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].book, "創世記");
        assert_eq!(verses[0].text, "起初， 神創造天地。");
        assert_eq!(verses[1].text, "地是空虛混沌 淵面黑暗");
    }

    #[test]
    fn test_html_anchor_name_encodes_chapter() {
        let html = r#"<h3>詩篇</h3><a name="019-23:1"></a>耶和華是我的牧者<br>
<a name="019-23:2"></a> 他使我躺臥在青草地上 <br>"#;
        let (_, verses) = extract_html(html, "019");
        assert_eq!(verses.len(), 2);
        assert_eq!((verses[0].chapter, verses[0].verse), (23, 1));
        assert_eq!(verses[1].text, "他使我躺臥在青草地上");
    }

    #[test]
    fn test_html_plain_caption() {
        let html = "<H3>約翰福音</H3><SMALL>3:16</SMALL>神愛世人<BR>";
        let (_, verses) = extract_html(html, "043");
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].book, "約翰福音");
        assert_eq!((verses[0].chapter, verses[0].verse), (3, 16));
    }

    #[test]
    fn test_html_first_matching_variant_is_exclusive() {
        // The plain caption would match too, but the anchored variant wins.
        let html = r#"<h3>創世記</h3>
<a name="a"></a><small>1:1</small>起初<br>
<small>1:2</small>地是空虛<br>"#;
        let (_, verses) = extract_html(html, "001");
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].verse, 1);
    }

    #[test]
    fn test_html_empty_text_discarded() {
        let html = "<h3>創世記</h3><small>1:1</small>   <br><small>1:2</small>地<br>";
        let (_, verses) = extract_html(html, "001");
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].verse, 2);
    }

    #[test]
    fn test_html_without_markers() {
        let (book, verses) = extract_html("<h3>創世記</h3><p>preface</p>", "001");
        assert_eq!(book, "創世記");
        assert!(verses.is_empty());
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(decode_entities("a &amp;lt; b"), "a &lt; b");
        assert_eq!(decode_entities("x&nbsp;y"), "x y");
    }
}
