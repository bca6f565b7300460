//! # Highlighter Module
//!
//! Splits an ingredient into words and punctuation and flags the words that are
//! risky, for display. Words are compared for equality with each term (or the
//! term followed by "s" or "es"), which is stricter than the substring matching
//! used by the classifier: "steak" is never highlighted, and multi-word terms
//! such as "black walnut" never match a single word.

use crate::ingredient_model::{HighlightSegment, RiskLevel};
use crate::term_lists::TermLists;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

/// Plural endings accepted after a term
const PLURAL_SUFFIXES: [&str; 3] = ["", "s", "es"];

/// Produces highlight segments for ingredient text
#[derive(Debug, Clone, Copy)]
pub struct Highlighter<'a> {
    terms: &'a TermLists,
}

impl<'a> Highlighter<'a> {
    pub fn new(terms: &'a TermLists) -> Self {
        Self { terms }
    }

    /// Split a token into word and non-word runs with their risk levels
    ///
    /// The token is walked by grapheme cluster, so a letter keeps its combining
    /// marks. Word clusters start with a letter or an apostrophe. Non-word runs
    /// are always [`RiskLevel::Safe`]. Joining the segment texts gives back the
    /// token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawcheck::highlighter::Highlighter;
    /// use pawcheck::ingredient_model::RiskLevel;
    /// use pawcheck::term_lists::TermLists;
    ///
    /// let segments = Highlighter::new(TermLists::builtin()).highlight("Raisins (dried)");
    /// assert_eq!(segments[0].text, "Raisins");
    /// assert_eq!(segments[0].risk, RiskLevel::Harmful);
    /// ```
    pub fn highlight(&self, token: &str) -> Vec<HighlightSegment> {
        let mut segments = Vec::new();
        let mut run_start = 0;
        let mut in_word: Option<bool> = None;

        for (index, grapheme) in token.grapheme_indices(true) {
            let is_word = grapheme.chars().next().is_some_and(is_word_char);
            if let Some(current) = in_word {
                if current != is_word {
                    segments.push(self.segment(&token[run_start..index], current));
                    run_start = index;
                }
            }
            in_word = Some(is_word);
        }
        if let Some(current) = in_word {
            segments.push(self.segment(&token[run_start..], current));
        }

        trace!(token, segments = segments.len(), "Highlighted ingredient");
        segments
    }

    /// Risk level of a single word, harmful terms checked before moderate ones
    pub fn word_risk(&self, word: &str) -> RiskLevel {
        let lowered = word.to_lowercase();

        if matches_any(self.terms.harmful(), &lowered) {
            RiskLevel::Harmful
        } else if matches_any(self.terms.moderate(), &lowered) {
            RiskLevel::Moderate
        } else {
            RiskLevel::Safe
        }
    }

    fn segment(&self, text: &str, is_word: bool) -> HighlightSegment {
        let risk = if is_word {
            self.word_risk(text)
        } else {
            RiskLevel::Safe
        };
        HighlightSegment::new(text, risk)
    }
}

impl Default for Highlighter<'static> {
    fn default() -> Self {
        Self::new(TermLists::builtin())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

fn matches_any(terms: &[String], word: &str) -> bool {
    terms.iter().any(|term| {
        word.strip_prefix(term.as_str())
            .is_some_and(|suffix| PLURAL_SUFFIXES.contains(&suffix))
    })
}

/// Highlight a token against the built-in term lists
pub fn highlight(token: &str) -> Vec<HighlightSegment> {
    Highlighter::default().highlight(token)
}
