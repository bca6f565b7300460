//! # Analysis Module
//!
//! Ties the core together: parses an ingredients text, classifies and
//! highlights every item, computes the product verdict and packages the result
//! as a [`ScanReport`] ready to be rendered.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::highlighter::Highlighter;
use crate::ingredient_model::{
    HighlightSegment, ParsedIngredients, RiskLevel, SafetyVerdict, Section, UNKNOWN_PRODUCT,
};
use crate::ingredient_parser::parse_ingredients;
use crate::product_lookup::ProductInfo;
use crate::term_lists::TermLists;

/// One parsed ingredient with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientReport {
    pub text: String,
    pub risk: RiskLevel,
    pub segments: Vec<HighlightSegment>,
}

/// Everything shown to the user about one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub product_name: String,
    pub barcode: Option<String>,
    pub product_url: Option<String>,
    pub verdict: SafetyVerdict,
    pub regular: Vec<IngredientReport>,
    pub contains: Vec<IngredientReport>,
    pub may_contain: Vec<IngredientReport>,
}

impl ScanReport {
    pub fn section(&self, section: Section) -> &[IngredientReport] {
        match section {
            Section::Regular => &self.regular,
            Section::Contains => &self.contains,
            Section::MayContain => &self.may_contain,
        }
    }

    /// Sections in display order
    pub fn sections(&self) -> [(Section, &[IngredientReport]); 3] {
        [
            (Section::Regular, &self.regular),
            (Section::Contains, &self.contains),
            (Section::MayContain, &self.may_contain),
        ]
    }

    pub fn ingredient_count(&self) -> usize {
        self.regular.len() + self.contains.len() + self.may_contain.len()
    }

    /// Highest risk among all items, `Safe` when there are none
    pub fn worst_risk(&self) -> RiskLevel {
        self.sections()
            .iter()
            .flat_map(|(_, items)| items.iter())
            .map(|item| item.risk)
            .max()
            .unwrap_or(RiskLevel::Safe)
    }
}

/// Builds scan reports against one set of term lists
#[derive(Debug, Clone)]
pub struct IngredientAnalyzer {
    terms: Arc<TermLists>,
}

impl Default for IngredientAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(TermLists::default()))
    }
}

impl IngredientAnalyzer {
    pub fn new(terms: Arc<TermLists>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &TermLists {
        &self.terms
    }

    /// Report for a looked-up product, linking to its page on `site_url`
    pub fn analyze_product(&self, product: &ProductInfo, site_url: &str) -> ScanReport {
        let mut report = self.analyze_text(&product.name, &product.ingredients_text);
        report.barcode = Some(product.barcode.clone());
        report.product_url = Some(product.product_url(site_url));
        report
    }

    /// Report for an ingredients text without a barcode (pasted or read from a photo)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawcheck::analysis::IngredientAnalyzer;
    /// use pawcheck::ingredient_model::SafetyVerdict;
    ///
    /// let report = IngredientAnalyzer::default().analyze_text("Treats", "beef, rice, garlic");
    /// assert_eq!(report.verdict, SafetyVerdict::Unsafe);
    /// assert_eq!(report.regular.len(), 3);
    /// ```
    pub fn analyze_text(&self, product_name: &str, ingredients_text: &str) -> ScanReport {
        let classifier = Classifier::new(&self.terms);
        let highlighter = Highlighter::new(&self.terms);

        let verdict = classifier.safety_verdict(ingredients_text);
        // Unusable text (blank or the unavailable placeholder) yields no items
        let parsed = if verdict.is_known() {
            parse_ingredients(ingredients_text)
        } else {
            ParsedIngredients::default()
        };

        let build = |items: &[String]| -> Vec<IngredientReport> {
            items
                .iter()
                .map(|item| IngredientReport {
                    text: item.clone(),
                    risk: classifier.classify(item),
                    segments: highlighter.highlight(item),
                })
                .collect()
        };

        let name = product_name.trim();
        let report = ScanReport {
            product_name: if name.is_empty() {
                UNKNOWN_PRODUCT.to_string()
            } else {
                name.to_string()
            },
            barcode: None,
            product_url: None,
            verdict,
            regular: build(&parsed.regular),
            contains: build(&parsed.contains),
            may_contain: build(&parsed.may_contain),
        };

        info!(
            product = %report.product_name,
            %verdict,
            ingredients = report.ingredient_count(),
            "Ingredients analyzed"
        );
        report
    }
}

/// Bounded cache of reports keyed by barcode, evicting the oldest entry first
#[derive(Debug)]
pub struct ReportCache {
    capacity: usize,
    inner: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    reports: HashMap<String, ScanReport>,
    order: VecDeque<String>,
}

impl ReportCache {
    /// Create a cache; a capacity of zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheState::default()),
        }
    }

    pub fn get(&self, barcode: &str) -> Option<ScanReport> {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let hit = state.reports.get(barcode).cloned();
        debug!(barcode, hit = hit.is_some(), "Report cache lookup");
        hit
    }

    pub fn insert(&self, barcode: &str, report: ScanReport) {
        if self.capacity == 0 {
            return;
        }

        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.reports.insert(barcode.to_string(), report).is_none() {
            state.order.push_back(barcode.to_string());
        }

        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.reports.remove(&oldest);
                debug!(barcode = %oldest, "Evicted report from cache");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reports
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[IngredientReport]) -> Vec<&str> {
        items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn test_analyze_text_sections_and_risks() {
        let analyzer = IngredientAnalyzer::default();
        let report = analyzer.analyze_text(
            "Chicken Bites",
            "chicken, water, salt. contains soy, wheat. may contain traces of peanuts, tree nuts.",
        );

        assert_eq!(texts(&report.regular), vec!["chicken", "water", "salt."]);
        assert_eq!(texts(&report.contains), vec!["soy", "wheat."]);
        assert_eq!(texts(&report.may_contain), vec!["traces of peanuts", "tree nuts."]);
        assert_eq!(report.verdict, SafetyVerdict::Safe);
        assert_eq!(report.regular[2].risk, RiskLevel::Moderate);
        assert_eq!(report.contains[0].risk, RiskLevel::Safe);
        assert_eq!(report.worst_risk(), RiskLevel::Moderate);
        assert_eq!(report.barcode, None);
    }

    #[test]
    fn test_analyze_product_links_page() {
        let analyzer = IngredientAnalyzer::default();
        let product = ProductInfo {
            barcode: "3017620422003".to_string(),
            name: "Spread".to_string(),
            ingredients_text: "sugar, palm oil, hazelnuts, cocoa".to_string(),
        };

        let report = analyzer.analyze_product(&product, "https://world.openfoodfacts.org");
        assert_eq!(report.barcode.as_deref(), Some("3017620422003"));
        assert_eq!(
            report.product_url.as_deref(),
            Some("https://world.openfoodfacts.org/product/3017620422003")
        );
        assert_eq!(report.verdict, SafetyVerdict::Unsafe);
        assert_eq!(report.regular[3].risk, RiskLevel::Harmful);
    }

    #[test]
    fn test_placeholder_product_is_unknown_and_empty() {
        let report = IngredientAnalyzer::default()
            .analyze_product(&ProductInfo::unavailable("12345678"), "https://example.org");

        assert_eq!(report.product_name, UNKNOWN_PRODUCT);
        assert_eq!(report.verdict, SafetyVerdict::Unknown);
        assert_eq!(report.ingredient_count(), 0);

        let report = IngredientAnalyzer::default().analyze_text("X", "  Ingredients Unavailable ");
        assert_eq!(report.verdict, SafetyVerdict::Unknown);
        assert!(report.regular.is_empty());
    }

    #[test]
    fn test_blank_name_falls_back() {
        let report = IngredientAnalyzer::default().analyze_text("  ", "");
        assert_eq!(report.product_name, UNKNOWN_PRODUCT);
        assert_eq!(report.ingredient_count(), 0);
        assert_eq!(report.worst_risk(), RiskLevel::Safe);
        assert_eq!(report.verdict, SafetyVerdict::Unknown);
    }

    #[test]
    fn test_custom_terms() {
        let analyzer = IngredientAnalyzer::new(Arc::new(TermLists::new(["paprika"], ["rice"])));
        let report = analyzer.analyze_text("Mix", "rice, paprika, chocolate");

        let risks: Vec<RiskLevel> = report.regular.iter().map(|item| item.risk).collect();
        assert_eq!(risks, vec![RiskLevel::Moderate, RiskLevel::Harmful, RiskLevel::Safe]);
        assert_eq!(report.verdict, SafetyVerdict::Unsafe);
    }

    #[test]
    fn test_report_cache_evicts_oldest() {
        let analyzer = IngredientAnalyzer::default();
        let cache = ReportCache::new(2);
        assert!(cache.is_empty());

        cache.insert("1111", analyzer.analyze_text("one", "beef"));
        cache.insert("2222", analyzer.analyze_text("two", "rice"));
        cache.insert("1111", analyzer.analyze_text("one again", "beef"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("1111").map(|r| r.product_name), Some("one again".to_string()));

        cache.insert("3333", analyzer.analyze_text("three", "peas"));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("1111").is_none());
        assert!(cache.get("2222").is_some());
        assert!(cache.get("3333").is_some());
    }

    #[test]
    fn test_report_cache_disabled() {
        let cache = ReportCache::new(0);
        cache.insert("1111", IngredientAnalyzer::default().analyze_text("one", "beef"));
        assert!(cache.get("1111").is_none());
        assert!(cache.is_empty());
    }
}
