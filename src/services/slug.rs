//! URL slugs for dish names, categories and page titles.
//!
//! Slugs end up in URLs and as lookup keys, so the output for a given input
//! must never change between releases. Non-Latin scripts are dropped rather
//! than transliterated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

const MAX_SLUG_LEN: usize = 200;

static SEPARATOR_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("separator pattern is valid"));

/// Converts arbitrary text into a lowercase, ASCII, hyphen-delimited slug.
///
/// Vietnamese diacritics are removed through NFD decomposition and `Đ`/`đ`
/// (which has no decomposition) becomes `d`. Empty input gives an empty slug.
pub fn slugify(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let lowered = input.to_lowercase();
    let kept: String = lowered
        .trim()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .filter(|c| is_kept(*c))
        .collect();

    SEPARATOR_RUNS
        .replace_all(&kept, "-")
        .trim_matches('-')
        .to_string()
}

/// Like [`slugify`], but for values that may be missing entirely.
pub fn slugify_opt(input: Option<&str>) -> String {
    input.map(slugify).unwrap_or_default()
}

pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

// U+0300..=U+036F, the Combining Diacritical Marks block.
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

// Underscores survive here only so the separator pass can fold them.
fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '_'
}

/// A slug value. The only way to build one is through [`slugify`], so every
/// `Slug` satisfies the slug alphabet and shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(input: &str) -> Self {
        Self(slugify(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Slug {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl From<String> for Slug {
    fn from(input: String) -> Self {
        Self::new(&input)
    }
}

impl From<Option<&str>> for Slug {
    fn from(input: Option<&str>) -> Self {
        Self(slugify_opt(input))
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}
