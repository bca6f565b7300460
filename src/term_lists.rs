//! # Term Lists Module
//!
//! Curated reference terms used to classify ingredients. Two disjoint, ordered
//! collections exist: harmful terms and moderate-risk terms. The built-in lists
//! are created once per process and shared by reference with the classifier and
//! the highlighter.

use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Ingredients that are toxic or dangerous for dogs
pub const HARMFUL_TERMS: &[&str] = &[
    // Sweeteners
    "xylitol", "erythritol", "artificial sweetener", "sugar alcohol",
    // Chocolate and caffeine
    "chocolate", "cocoa", "theobromine", "caffeine", "coffee", "tea",
    // Fruits
    "grape", "raisin", "currant", "sultana",
    // Alliums
    "onion", "garlic", "chive", "leek", "shallot", "allium",
    // Alcohol
    "alcohol", "ethanol", "beer", "wine", "liquor", "hops",
    // Nuts
    "macadamia", "walnut", "black walnut",
    // Other
    "avocado", "persin", "yeast dough", "raw yeast", "nutmeg", "rhubarb",
    "green tomato", "green potato", "solanine", "cherry pit", "peach pit",
    "plum pit", "persimmon seed", "mold", "mould", "penicillin", "poppy seed",
];

/// Ingredients that are acceptable in small amounts but worth flagging
pub const MODERATE_TERMS: &[&str] = &[
    // High fat
    "bacon", "fatty meat", "fried food", "lard", "shortening",
    // Salt and sodium
    "salt", "sodium", "soy sauce", "bouillon", "stock cube",
    // Dairy
    "milk", "cheese", "cream", "lactose", "ice cream",
    // Bones
    "cooked bone", "poultry bone", "fish bone",
    // Raw foods
    "raw egg", "raw fish", "raw salmon", "raw meat",
    // Spices
    "cinnamon", "cayenne", "chili", "hot pepper",
    // Other
    "sugar", "corn syrup", "bread", "dough", "rawhide",
];

static BUILTIN: LazyLock<TermLists> =
    LazyLock::new(|| TermLists::new(HARMFUL_TERMS.iter().copied(), MODERATE_TERMS.iter().copied()));

/// The harmful and moderate-risk term collections
///
/// Terms are stored lowercased and trimmed, in their original order. Duplicates
/// are dropped, and a term present in both collections is kept only in the
/// harmful one so the two lists stay disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermLists {
    harmful: Vec<String>,
    moderate: Vec<String>,
}

impl TermLists {
    /// Build term lists from arbitrary phrases
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawcheck::term_lists::TermLists;
    ///
    /// let terms = TermLists::new(["Onion", "grape"], ["salt", "onion"]);
    /// assert_eq!(terms.harmful(), ["onion", "grape"]);
    /// assert_eq!(terms.moderate(), ["salt"]);
    /// ```
    pub fn new<H, M, S, T>(harmful: H, moderate: M) -> Self
    where
        H: IntoIterator<Item = S>,
        M: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let harmful = normalize_terms(harmful, &mut seen);
        let moderate = normalize_terms(moderate, &mut seen);
        Self { harmful, moderate }
    }

    /// The process-wide built-in lists
    pub fn builtin() -> &'static TermLists {
        &BUILTIN
    }

    /// Built-in lists extended with additional terms, typically from configuration
    pub fn builtin_with_extras(extra_harmful: &[String], extra_moderate: &[String]) -> Self {
        if extra_harmful.is_empty() && extra_moderate.is_empty() {
            return Self::builtin().clone();
        }

        debug!(
            extra_harmful = extra_harmful.len(),
            extra_moderate = extra_moderate.len(),
            "Extending built-in term lists"
        );

        let harmful = HARMFUL_TERMS
            .iter()
            .map(|term| term.to_string())
            .chain(extra_harmful.iter().cloned());
        let moderate = MODERATE_TERMS
            .iter()
            .map(|term| term.to_string())
            .chain(extra_moderate.iter().cloned());
        Self::new(harmful, moderate)
    }

    pub fn harmful(&self) -> &[String] {
        &self.harmful
    }

    pub fn moderate(&self) -> &[String] {
        &self.moderate
    }
}

impl Default for TermLists {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn normalize_terms<I, S>(terms: I, seen: &mut HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
