//! # Ingredient Data Model
//!
//! Value types produced by the parser, the classifier and the highlighter.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredients**: regular ingredients plus the "contains" and
//!   "may contain" statements found in a label
//! - **RiskLevel**: per-ingredient classification (harmful, moderate, safe)
//! - **SafetyVerdict**: whole-product answer derived from the raw text
//! - **HighlightSegment**: a run of characters with its risk level, for display
//!
//! ## Usage
//!
//! ```rust
//! use pawcheck::ingredient_model::{RiskLevel, SafetyVerdict};
//!
//! assert!(RiskLevel::Harmful > RiskLevel::Moderate);
//! assert_eq!(SafetyVerdict::Unsafe.to_string(), "unsafe");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ingredients text used when a product or its ingredients could not be found
pub const INGREDIENTS_UNAVAILABLE: &str = "ingredients unavailable";

/// Product name used when the product record has no name
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Section of an ingredients statement an item was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Regular,
    Contains,
    MayContain,
}

impl Section {
    /// Localization key of the section heading
    pub fn title_key(&self) -> &'static str {
        match self {
            Section::Regular => "section-ingredients",
            Section::Contains => "section-contains",
            Section::MayContain => "section-may-contain",
        }
    }
}

/// Structured result of parsing an ingredients statement
///
/// Every item is trimmed and non-empty. Items keep the punctuation they had in
/// the source text (e.g. a trailing period before a "contains" clause).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredients {
    /// Main ingredient list
    pub regular: Vec<String>,
    /// Items of the "contains ..." statement
    pub contains: Vec<String>,
    /// Items of the "may contain ..." statement
    pub may_contain: Vec<String>,
}

impl ParsedIngredients {
    /// True when no section holds any item
    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.contains.is_empty() && self.may_contain.is_empty()
    }

    /// Number of items across all sections
    pub fn total_count(&self) -> usize {
        self.regular.len() + self.contains.len() + self.may_contain.len()
    }

    /// Items of a single section
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Regular => &self.regular,
            Section::Contains => &self.contains,
            Section::MayContain => &self.may_contain,
        }
    }

    /// Sections in display order, paired with their items
    pub fn sections(&self) -> [(Section, &[String]); 3] {
        [
            (Section::Regular, self.regular.as_slice()),
            (Section::Contains, self.contains.as_slice()),
            (Section::MayContain, self.may_contain.as_slice()),
        ]
    }
}

/// Risk classification of a single ingredient or word
///
/// Ordered from least to most severe so the worst level of a set can be taken
/// with `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Moderate,
    Harmful,
}

impl RiskLevel {
    pub fn is_safe(&self) -> bool {
        matches!(self, RiskLevel::Safe)
    }

    /// Status icon shown next to an ingredient
    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::Harmful => "❌",
            RiskLevel::Moderate => "⚠️",
            RiskLevel::Safe => "✅",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Harmful => write!(f, "harmful"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::Safe => write!(f, "safe"),
        }
    }
}

/// Whole-product safety answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyVerdict {
    /// No ingredients text, or the text is the unavailable placeholder
    #[default]
    Unknown,
    Safe,
    Unsafe,
}

impl SafetyVerdict {
    pub fn is_known(&self) -> bool {
        !matches!(self, SafetyVerdict::Unknown)
    }

    /// Localization key of the verdict line
    pub fn message_key(&self) -> &'static str {
        match self {
            SafetyVerdict::Unknown => "verdict-unknown",
            SafetyVerdict::Safe => "verdict-safe",
            SafetyVerdict::Unsafe => "verdict-unsafe",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SafetyVerdict::Unknown => "❓",
            SafetyVerdict::Safe => "🐾",
            SafetyVerdict::Unsafe => "🚫",
        }
    }
}

impl fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyVerdict::Unknown => write!(f, "unknown"),
            SafetyVerdict::Safe => write!(f, "safe"),
            SafetyVerdict::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// A run of characters of an ingredient with its display risk level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    /// Text exactly as it appeared in the ingredient
    pub text: String,
    pub risk: RiskLevel,
}

impl HighlightSegment {
    pub fn new(text: impl Into<String>, risk: RiskLevel) -> Self {
        Self {
            text: text.into(),
            risk,
        }
    }
}

/// Rebuild the ingredient text from its highlight segments
pub fn join_segments(segments: &[HighlightSegment]) -> String {
    segments.iter().map(|segment| segment.text.as_str()).collect()
}
