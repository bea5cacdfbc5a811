//! Scoring primitives shared by the evaluator and the fallback search.

use rapidfuzz::distance::levenshtein;
use regex::{Regex, RegexBuilder};

/// Multiplier for a bare value searched inside an explicit `field:`.
pub(crate) const FIELD_TERM_BOOST: f64 = 2.0;
/// Multiplier for a contiguous quoted phrase.
pub(crate) const PHRASE_BOOST: f64 = 1.5;
/// Wildcards match loosely, so they score slightly below the field weight.
pub(crate) const WILDCARD_FACTOR: f64 = 0.8;
/// Fuzzy matches score below wildcards.
pub(crate) const FUZZY_FACTOR: f64 = 0.7;

/// Flat per-field scores of the fallback substring search.
pub(crate) const SIMPLE_TITLE_SCORE: f64 = 3.0;
pub(crate) const SIMPLE_PATH_SCORE: f64 = 2.0;
pub(crate) const SIMPLE_TAGS_SCORE: f64 = 2.0;
pub(crate) const SIMPLE_CONTENT_SCORE: f64 = 1.0;

/// Count non-overlapping occurrences of `needle` in `haystack`.
///
/// An empty needle never occurs.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Compile a wildcard pattern into an unanchored, case-insensitive regex.
///
/// `*` matches any run of characters and `?` exactly one; everything else is literal.
pub fn wildcard_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() * 2);
    let mut literal = [0u8; 4];

    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }

    RegexBuilder::new(&source).case_insensitive(true).build()
}

/// Levenshtein distance between two strings, counted in characters.
///
/// Insertions, deletions and substitutions each cost 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein::distance(a.chars(), b.chars())
}
