//! # Ingredient Parser
//!
//! Turns a free-text ingredients statement into structured lists.
//!
//! ## Features
//!
//! - Extract "contains ..." and "may contain ..." statements
//! - Split the remaining text on top-level commas only
//! - Total over any input: malformed or empty text yields a defined result
//!
//! ## Usage
//!
//! ```rust
//! use pawcheck::ingredient_parser::parse_ingredients;
//!
//! let parsed = parse_ingredients("Beef, Rice. Contains Soy. May contain Milk.");
//! assert_eq!(parsed.regular, vec!["beef", "rice."]);
//! assert_eq!(parsed.contains, vec!["soy."]);
//! assert_eq!(parsed.may_contain, vec!["milk."]);
//! ```

use crate::ingredient_model::ParsedIngredients;
use crate::text_processing::split_top_level;
use tracing::{debug, trace};

/// Free-text statements that can follow the main ingredient list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Contains,
    MayContain,
}

impl StatementKind {
    /// Lowercase keyword that opens the statement, including its trailing space
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Contains => "contains ",
            StatementKind::MayContain => "may contain ",
        }
    }
}

/// Result of extracting one statement from a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedStatement {
    /// Items of the statement, split on top-level commas
    pub items: Vec<String>,
    /// Text before the keyword, or the whole text when the keyword is absent
    pub remaining: String,
}

/// Extract a "contains" or "may contain" statement from lowercased text
///
/// Only the first occurrence of the keyword is used. Everything from the
/// keyword onward is removed from the remaining text. A "contains" statement
/// ends where a later "may contain " starts, so callers must extract
/// [`StatementKind::MayContain`] first and pass the remainder on for
/// [`StatementKind::Contains`].
pub fn extract_statement(text: &str, kind: StatementKind) -> ExtractedStatement {
    let keyword = kind.keyword();

    let Some(start) = text.find(keyword) else {
        trace!(keyword, "Statement keyword not found");
        return ExtractedStatement {
            items: Vec::new(),
            remaining: text.to_string(),
        };
    };

    let after_keyword = &text[start + keyword.len()..];
    let statement = match kind {
        StatementKind::Contains => {
            let end = after_keyword
                .find(StatementKind::MayContain.keyword())
                .unwrap_or(after_keyword.len());
            &after_keyword[..end]
        }
        StatementKind::MayContain => after_keyword,
    };

    let items = split_top_level(statement);
    debug!(keyword, position = start, items = items.len(), "Extracted statement");

    ExtractedStatement {
        items,
        remaining: text[..start].to_string(),
    }
}

/// Parse a raw ingredients statement into regular, "contains" and "may contain" items
///
/// The text is lowercased first; items keep their punctuation and are only
/// trimmed of surrounding whitespace.
pub fn parse_ingredients(raw: &str) -> ParsedIngredients {
    let text = raw.to_lowercase();

    let may_contain = extract_statement(&text, StatementKind::MayContain);
    let contains = extract_statement(&may_contain.remaining, StatementKind::Contains);
    let regular = split_top_level(contains.remaining.trim());

    debug!(
        regular = regular.len(),
        contains = contains.items.len(),
        may_contain = may_contain.items.len(),
        "Parsed ingredients statement"
    );

    ParsedIngredients {
        regular,
        contains: contains.items,
        may_contain: may_contain.items,
    }
}
