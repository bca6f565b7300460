//! # Text Processing Module
//!
//! Low-level text utilities shared by the ingredient parser and the OCR pipeline.
//!
//! ## Features
//!
//! - Depth-aware comma splitting that never splits inside `()`, `[]` or `{}`
//! - Tolerant handling of malformed nesting (unmatched closers)
//! - Clean-up of recognized label text before it is parsed

use tracing::{debug, trace};

/// Headers that introduce an ingredients list on a printed label, in priority order
pub const LABEL_HEADERS: [&str; 3] = ["ingredients", "contains", "ingrédients"];

/// Nesting depth for the three bracket kinds
///
/// Counters go up on an opener and down on the matching closer with no
/// underflow check. An unmatched closer therefore drives a counter negative,
/// and a comma is only a split point while all three counters are exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketDepth {
    pub paren: i32,
    pub bracket: i32,
    pub brace: i32,
}

impl BracketDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the counters for one character
    pub fn track(&mut self, c: char) {
        match c {
            '(' => self.paren += 1,
            ')' => self.paren -= 1,
            '[' => self.bracket += 1,
            ']' => self.bracket -= 1,
            '{' => self.brace += 1,
            '}' => self.brace -= 1,
            _ => {}
        }
    }

    /// True when no bracket of any kind is open (or over-closed)
    pub fn is_top_level(&self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0
    }
}

/// Split text on top-level commas
///
/// Items are trimmed and empty items are dropped.
///
/// # Examples
///
/// ```rust
/// use pawcheck::text_processing::split_top_level;
///
/// let items = split_top_level("Natural Flavor (Onion, Garlic), Rice");
/// assert_eq!(items, vec!["Natural Flavor (Onion, Garlic)", "Rice"]);
/// ```
pub fn split_top_level(text: &str) -> Vec<String> {
    split_top_level_from(text, BracketDepth::new())
}

/// Split text on top-level commas, starting from the given nesting depth
///
/// Useful when `text` is a fragment of a larger string whose earlier part left
/// brackets open.
pub fn split_top_level_from(text: &str, mut depth: BracketDepth) -> Vec<String> {
    let mut items = Vec::new();
    let mut start = 0;

    for (index, c) in text.char_indices() {
        if c == ',' && depth.is_top_level() {
            push_trimmed(&mut items, &text[start..index]);
            start = index + c.len_utf8();
        } else {
            depth.track(c);
        }
    }
    push_trimmed(&mut items, &text[start..]);

    if !depth.is_top_level() {
        debug!(?depth, "Unbalanced brackets left after splitting");
    }
    trace!(items = items.len(), "Split text on top-level commas");

    items
}

fn push_trimmed(items: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        items.push(trimmed.to_string());
    }
}

/// Prepare text produced by optical recognition for the ingredient parser
///
/// The text is lowercased, everything up to and including the first label
/// header is dropped (headers are tried in [`LABEL_HEADERS`] order and only the
/// first one found is used), colons are removed and bullets become commas.
///
/// # Examples
///
/// ```rust
/// use pawcheck::text_processing::clean_recognized_text;
///
/// let cleaned = clean_recognized_text("NET WT 2oz\nIngredients: Chicken • Rice");
/// assert_eq!(cleaned, " chicken , rice");
/// ```
pub fn clean_recognized_text(text: &str) -> String {
    let lowered = text.to_lowercase();

    let body = LABEL_HEADERS
        .iter()
        .find_map(|header| {
            lowered.find(header).map(|pos| {
                debug!(header, position = pos, "Found label header in recognized text");
                &lowered[pos + header.len()..]
            })
        })
        .unwrap_or(&lowered);

    body.replace(':', "").replace('•', ",")
}
