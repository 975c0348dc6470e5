//! Anchor labels and attribute dimensions.
//!
//! Labels are derived from text alone, so a heading's generated anchor and a
//! `#fragment` link to it agree without any shared state.

use crate::model::{ElementId, ElementTree};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)\s*(%|[a-z]+)?$").expect("dimension pattern is valid")
});

/// Derive an anchor identifier from text.
///
/// Accents are folded, letters lowercased, whitespace runs become a single
/// `-`, and anything outside `[a-z0-9._:-]` is dropped. Identical text
/// always yields the identical label; empty input yields an empty label.
pub fn label_from_text(text: &str) -> String {
    let mut label = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase()
                || lower.is_ascii_digit()
                || matches!(lower, '.' | '_' | ':' | '-')
            {
                if pending_dash && !label.is_empty() {
                    label.push('-');
                }
                pending_dash = false;
                label.push(lower);
            }
        }
    }
    label.trim_matches('-').to_string()
}

/// Derive an anchor identifier from inline elements.
pub fn label_from_elements(tree: &ElementTree, ids: &[ElementId]) -> String {
    label_from_text(&tree.plain_text(ids))
}

/// Label referenced by an internal `#fragment` URL.
pub fn label_from_fragment(url: &str) -> String {
    label_from_text(url.trim_start_matches('#'))
}

/// Convert an image `width`/`height` attribute to a LaTeX dimension.
///
/// `50%` becomes a fraction of `\textwidth`, a bare number is taken as
/// points, `px` is read as points, and any other unit is kept. Values that
/// are not a number with an optional unit give `None`.
pub fn dimension_for_attribute(value: &str) -> Option<String> {
    let value = value.trim().to_lowercase();
    let caps = DIMENSION.captures(&value)?;
    let number = caps.get(1)?.as_str();
    match caps.get(2).map(|m| m.as_str()) {
        Some("%") => {
            let fraction = number.parse::<f64>().ok()? / 100.0;
            Some(format!("{}\\textwidth", fraction))
        }
        None | Some("px") => Some(format!("{}pt", number)),
        Some(unit) => Some(format!("{}{}", number, unit)),
    }
}
