//! # Classifier Module
//!
//! Per-ingredient risk classification and the whole-product safety verdict.
//!
//! Both use unanchored substring containment against the term lists, so a term
//! also matches inside a longer word: "onion powder" and "garlicky" are caught,
//! and so is "steak" (via "tea").

use crate::ingredient_model::{RiskLevel, SafetyVerdict, INGREDIENTS_UNAVAILABLE};
use crate::term_lists::TermLists;
use tracing::{debug, trace};

/// Classifies ingredient text against a set of term lists
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    terms: &'a TermLists,
}

impl<'a> Classifier<'a> {
    pub fn new(terms: &'a TermLists) -> Self {
        Self { terms }
    }

    /// Classify a single ingredient token
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawcheck::classifier::Classifier;
    /// use pawcheck::ingredient_model::RiskLevel;
    /// use pawcheck::term_lists::TermLists;
    ///
    /// let classifier = Classifier::new(TermLists::builtin());
    /// assert_eq!(classifier.classify("Onion Powder"), RiskLevel::Harmful);
    /// assert_eq!(classifier.classify("sea salt"), RiskLevel::Moderate);
    /// assert_eq!(classifier.classify("brown rice"), RiskLevel::Safe);
    /// ```
    pub fn classify(&self, token: &str) -> RiskLevel {
        self.matching_term(token)
            .map(|(_, risk)| risk)
            .unwrap_or(RiskLevel::Safe)
    }

    /// First term found in the token, harmful terms before moderate ones
    pub fn matching_term(&self, token: &str) -> Option<(&'a str, RiskLevel)> {
        let lowered = token.to_lowercase();

        let found = find_contained(self.terms.harmful(), &lowered)
            .map(|term| (term, RiskLevel::Harmful))
            .or_else(|| {
                find_contained(self.terms.moderate(), &lowered).map(|term| (term, RiskLevel::Moderate))
            });

        if let Some((term, risk)) = found {
            trace!(token, term, %risk, "Ingredient matched term");
        }
        found
    }

    /// Safety verdict for a whole ingredients text
    ///
    /// The verdict is computed on the full text, not on parsed items, and only
    /// harmful terms make a product unsafe.
    pub fn safety_verdict(&self, ingredients_text: &str) -> SafetyVerdict {
        let lowered = ingredients_text.trim().to_lowercase();

        if lowered.is_empty() || lowered == INGREDIENTS_UNAVAILABLE {
            debug!("No usable ingredients text, verdict unknown");
            return SafetyVerdict::Unknown;
        }

        match find_contained(self.terms.harmful(), &lowered) {
            Some(term) => {
                debug!(term, "Harmful term found in ingredients text");
                SafetyVerdict::Unsafe
            }
            None => SafetyVerdict::Safe,
        }
    }
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(TermLists::builtin())
    }
}

fn find_contained<'t>(terms: &'t [String], text: &str) -> Option<&'t str> {
    terms
        .iter()
        .find(|term| text.contains(term.as_str()))
        .map(String::as_str)
}

/// Classify a token against the built-in term lists
pub fn classify(token: &str) -> RiskLevel {
    Classifier::default().classify(token)
}

/// Safety verdict of an ingredients text against the built-in term lists
pub fn safety_verdict(ingredients_text: &str) -> SafetyVerdict {
    Classifier::default().safety_verdict(ingredients_text)
}
