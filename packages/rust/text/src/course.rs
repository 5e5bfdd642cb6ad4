//! Course-name normalization pipeline.
//!
//! Each pass is a function `&str -> String` applied in sequence. Order
//! matters: structural punctuation is removed before separators are
//! collapsed, and whitespace is collapsed last so earlier passes may
//! leave gaps behind.

use std::sync::LazyLock;

use regex::Regex;

/// Normalize a raw course name into its matching key.
///
/// Total over any input. The result contains no parentheses, colons,
/// commas, slashes, ampersands or whitespace runs, and is lower-case.
/// Applying it twice yields the same string as applying it once.
pub fn normalize_course_name(raw: &str) -> String {
    let mut result = strip_punctuation(raw);

    result = drop_dash_separators(&result);
    result = spell_out_conjunctions(&result);
    result = collapse_whitespace(&result);

    result.to_lowercase()
}

// ---------------------------------------------------------------------------
// Pass 1: Remove structural punctuation
// ---------------------------------------------------------------------------

fn strip_punctuation(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '(' | ')' | ':' | ','))
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 2: Drop " - " title/subtitle separators
// ---------------------------------------------------------------------------

/// `Title - Subtitle` and `Title   - Subtitle` both become `Title Subtitle`.
/// A hyphen inside a word (`IT-Sicherheit`) is kept.
fn drop_dash_separators(s: &str) -> String {
    // Repeated group so "a - - b" collapses in one pass.
    static DASH_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?:\s+-)+\s").expect("valid regex"));

    DASH_RE.replace_all(s, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: "/" and "&" become "und"
// ---------------------------------------------------------------------------

fn spell_out_conjunctions(s: &str) -> String {
    s.replace(['/', '&'], "und")
}

// ---------------------------------------------------------------------------
// Pass 4: Collapse whitespace runs
// ---------------------------------------------------------------------------

fn collapse_whitespace(s: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(s, " ").into_owned()
}
