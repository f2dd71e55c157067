//! Text cleanup and phrase segmentation for skill extraction.

use std::sync::OnceLock;

use regex::Regex;

/// Bullet and separator glyphs that stand in for line breaks in extracted
/// document text. `â`, `€` and `¢` are the bytes of a mis-decoded `•`.
const SEPARATOR_GLYPHS: &[char] = &['•', '|', '\u{25AA}', '\u{25CF}', '\u{2023}', 'â', '€', '¢'];

/// Shortest phrase kept after trimming.
pub const MIN_PHRASE_CHARS: usize = 2;

fn line_break_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\n\s*").expect("valid regex"))
}

fn inline_space_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\S\n]+").expect("valid regex"))
}

fn phrase_delimiter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\n,.;:&]|\band\b").expect("valid regex"))
}

/// Turns separator glyphs into line breaks, collapses whitespace and
/// lower-cases. Runs containing a line break collapse to one `\n`; all other
/// runs collapse to one space.
pub fn clean_text(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if SEPARATOR_GLYPHS.contains(&c) { '\n' } else { c })
        .collect();

    let spaced = inline_space_run().replace_all(&replaced, " ");
    let lined = line_break_run().replace_all(&spaced, "\n");
    lined.trim().to_lowercase()
}

/// Splits cleaned text into candidate phrases on field delimiters (line
/// break, comma, period, semicolon, colon) and on the conjunctions `and`/`&`.
pub fn segment_phrases(cleaned: &str) -> Vec<String> {
    phrase_delimiter()
        .split(cleaned)
        .map(str::trim)
        .filter(|p| p.chars().count() >= MIN_PHRASE_CHARS)
        .map(String::from)
        .collect()
}
