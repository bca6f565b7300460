//! # Integration Tests
//!
//! End-to-end checks of the ingredient pipeline: raw text from a product
//! record, a paste or a label photo goes through parsing, classification,
//! highlighting and the product verdict.

use pawcheck::analysis::IngredientAnalyzer;
use pawcheck::classifier::{classify, safety_verdict};
use pawcheck::highlighter::highlight;
use pawcheck::ingredient_model::{join_segments, RiskLevel, SafetyVerdict};
use pawcheck::ingredient_parser::parse_ingredients;
use pawcheck::ocr::normalize_recognized_lines;
use pawcheck::product_lookup::{decode_product_response, ProductInfo};
use pawcheck::text_processing::clean_recognized_text;

const SAMPLES: &[&str] = &[
    "Chicken, Water, Salt. Contains Soy, Wheat. May contain traces of Peanuts, Tree Nuts.",
    "Beef (Beef, Water), Rice [Brown, White], Peas",
    "sugar, cocoa butter, whole milk powder, emulsifier (soy lecithin), vanilla",
    "beef), rice, corn",
    "a), b (c, d",
    "  ,, , ",
    "",
    "ingredients unavailable",
    "Lamb {New Zealand, grass fed}, sweet potato, peas. May contain: fish",
    "Raisins, oats, honey. contains tree nuts. may contain milk, eggs.",
    "Crème fraîche, œufs, sel de Guérande",
];

#[test]
fn test_full_label_scenario() {
    let parsed = parse_ingredients(SAMPLES[0]);

    assert_eq!(parsed.regular, vec!["chicken", "water", "salt."]);
    assert_eq!(parsed.contains, vec!["soy", "wheat."]);
    assert_eq!(parsed.may_contain, vec!["traces of peanuts", "tree nuts."]);
    assert_eq!(safety_verdict(SAMPLES[0]), SafetyVerdict::Safe);
}

#[test]
fn test_nested_brackets_scenario() {
    let parsed = parse_ingredients(SAMPLES[1]);

    assert_eq!(
        parsed.regular,
        vec!["beef (beef, water)", "rice [brown, white]", "peas"]
    );
    assert!(parsed.contains.is_empty());
    assert!(parsed.may_contain.is_empty());
}

#[test]
fn test_chocolate_product_is_unsafe() {
    let report = IngredientAnalyzer::default().analyze_text("Bar", SAMPLES[2]);

    let risks: Vec<RiskLevel> = report.regular.iter().map(|item| item.risk).collect();
    assert_eq!(
        risks,
        vec![
            RiskLevel::Moderate,
            RiskLevel::Harmful,
            RiskLevel::Moderate,
            RiskLevel::Safe,
            RiskLevel::Safe,
        ]
    );
    assert_eq!(report.verdict, SafetyVerdict::Unsafe);
}

#[test]
fn test_substring_false_positive_is_preserved() {
    // "steak" contains "tea"
    assert_eq!(classify("steak"), RiskLevel::Harmful);
    assert_eq!(safety_verdict("beef steak, rice"), SafetyVerdict::Unsafe);

    // The highlighter compares whole words, so nothing is emphasized
    let segments = highlight("steak");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].risk, RiskLevel::Safe);
}

#[test]
fn test_reversed_statement_order() {
    let parsed = parse_ingredients("Beef. May contain milk. Contains soy");

    assert_eq!(parsed.regular, vec!["beef."]);
    assert!(parsed.contains.is_empty());
    assert_eq!(parsed.may_contain, vec!["milk. contains soy"]);
}

#[test]
fn test_unmatched_closer_disables_splitting() {
    let parsed = parse_ingredients(SAMPLES[3]);
    assert_eq!(parsed.regular, vec!["beef), rice, corn"]);
}

#[test]
fn test_ocr_label_to_report() {
    let recognized = normalize_recognized_lines(
        "NET WT 100g\n\n  INGREDIENTS: Chicken • Rice • Garlic Powder\nMay contain: milk  \n",
    );
    let cleaned = clean_recognized_text(&recognized);
    let report = IngredientAnalyzer::default().analyze_text("Scanned label", &cleaned);

    let regular: Vec<&str> = report.regular.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(regular, vec!["chicken", "rice", "garlic powder"]);
    let may_contain: Vec<&str> = report.may_contain.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(may_contain, vec!["milk"]);
    assert_eq!(report.verdict, SafetyVerdict::Unsafe);
    assert_eq!(report.regular[2].risk, RiskLevel::Harmful);
}

#[test]
fn test_product_record_to_report() {
    let body = r#"{"code":"3017620422003","product":{"product_name":"Puppy Biscuits","ingredients_text":"Wheat flour, chicken fat, Raisins, salt"}}"#;
    let product = decode_product_response("3017620422003", body).unwrap();
    let report = IngredientAnalyzer::default()
        .analyze_product(&product, "https://world.openfoodfacts.org");

    assert_eq!(report.product_name, "Puppy Biscuits");
    assert_eq!(report.verdict, SafetyVerdict::Unsafe);
    assert_eq!(report.regular[2].text, "raisins");
    assert_eq!(report.regular[2].risk, RiskLevel::Harmful);
    assert_eq!(report.regular[2].segments[0].risk, RiskLevel::Harmful);
    assert_eq!(
        report.product_url.as_deref(),
        Some("https://world.openfoodfacts.org/product/3017620422003")
    );
}

#[test]
fn test_missing_product_is_unknown() {
    let product = decode_product_response("12345678", r#"{"status":0}"#).unwrap();
    assert_eq!(product, ProductInfo::unavailable("12345678"));

    let report = IngredientAnalyzer::default().analyze_product(&product, "https://example.org");
    assert_eq!(report.verdict, SafetyVerdict::Unknown);
    assert_eq!(report.ingredient_count(), 0);
}

#[test]
fn test_parsed_items_are_trimmed_and_non_empty() {
    for sample in SAMPLES {
        let parsed = parse_ingredients(sample);
        for (_, items) in parsed.sections() {
            for item in items {
                assert!(!item.is_empty(), "empty item from {sample:?}");
                assert_eq!(item, item.trim(), "untrimmed item from {sample:?}");
                assert_eq!(item, &item.to_lowercase(), "item not lowercased from {sample:?}");
            }
        }
    }
}

fn squeeze(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

#[test]
fn test_sections_cover_the_statement() {
    for sample in SAMPLES {
        let parsed = parse_ingredients(sample);
        let lowered = sample.to_lowercase();
        let before_may_contain = lowered
            .find("may contain ")
            .map_or(lowered.as_str(), |index| &lowered[..index]);

        let mut rebuilt = parsed.regular.join(",");
        if before_may_contain.contains("contains ") {
            rebuilt.push_str("contains ");
            rebuilt.push_str(&parsed.contains.join(","));
        } else {
            assert!(parsed.contains.is_empty(), "sample {sample:?}");
        }
        if lowered.contains("may contain ") {
            rebuilt.push_str("may contain ");
            rebuilt.push_str(&parsed.may_contain.join(","));
        } else {
            assert!(parsed.may_contain.is_empty(), "sample {sample:?}");
        }

        assert_eq!(squeeze(&rebuilt), squeeze(&lowered), "sample {sample:?}");
    }
}

#[test]
fn test_parse_is_deterministic() {
    for sample in SAMPLES {
        assert_eq!(parse_ingredients(sample), parse_ingredients(sample));
    }
}

#[test]
fn test_highlight_reconstructs_items() {
    for sample in SAMPLES {
        for (_, items) in parse_ingredients(sample).sections() {
            for item in items {
                assert_eq!(&join_segments(&highlight(item)), item);
            }
        }
    }
}

#[test]
fn test_harmful_item_implies_unsafe_verdict() {
    for sample in SAMPLES {
        let parsed = parse_ingredients(sample);
        let any_harmful = parsed
            .sections()
            .iter()
            .flat_map(|(_, items)| items.iter())
            .any(|item| classify(item) == RiskLevel::Harmful);

        if any_harmful {
            assert_eq!(safety_verdict(sample), SafetyVerdict::Unsafe, "sample {sample:?}");
        }
    }
}

#[test]
fn test_blank_and_placeholder_text_is_unknown() {
    assert_eq!(safety_verdict(""), SafetyVerdict::Unknown);
    assert_eq!(safety_verdict(" \n\t "), SafetyVerdict::Unknown);
    assert_eq!(safety_verdict("Ingredients Unavailable"), SafetyVerdict::Unknown);
    assert_eq!(safety_verdict("beef"), SafetyVerdict::Safe);
}
