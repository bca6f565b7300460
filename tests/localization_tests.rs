//! # Localization Tests
//!
//! Every bundled language must define the same messages, and every message the
//! bot looks up must exist.

use pawcheck::ingredient_model::{SafetyVerdict, Section};
use pawcheck::localization::{get_localization_manager, t_args_lang, t_lang, LocalizationManager, RESOURCES};
use pawcheck::ocr_errors::OcrError;
use std::collections::BTreeSet;

#[cfg(test)]
mod tests {
    use super::*;

    fn message_ids(source: &str) -> BTreeSet<&str> {
        source
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with(' '))
            .filter_map(|line| line.split_once(" = ").map(|(id, _)| id.trim()))
            .collect()
    }

    const BOT_KEYS: &[&str] = &[
        "welcome-title",
        "welcome-description",
        "welcome-barcode",
        "welcome-text",
        "welcome-photo",
        "welcome-help",
        "help-title",
        "help-barcode",
        "help-text",
        "help-photo",
        "help-legend",
        "help-legend-harmful",
        "help-legend-moderate",
        "help-legend-safe",
        "help-note",
        "product-title",
        "barcode-line",
        "scanned-label",
        "pasted-ingredients",
        "no-ingredients",
        "disclaimer",
        "button-product-page",
        "looking-up",
        "processing-photo",
        "processing-document",
        "error-download-failed",
        "error-unsupported-format",
        "error-no-mime-type",
        "error-no-text-found",
        "unsupported-message",
    ];

    #[test]
    fn test_manager_loads_all_resources() {
        assert!(LocalizationManager::new().is_ok());
    }

    #[test]
    fn test_languages_define_same_messages() {
        let (_, english) = RESOURCES[0];
        let expected = message_ids(english);
        assert!(!expected.is_empty());

        for (language, source) in RESOURCES {
            assert_eq!(message_ids(source), expected, "message ids differ for {language}");
        }
    }

    #[test]
    fn test_bot_keys_exist_in_every_language() {
        let manager = get_localization_manager();
        let verdict_keys = [SafetyVerdict::Unknown, SafetyVerdict::Safe, SafetyVerdict::Unsafe]
            .map(|verdict| verdict.message_key());
        let section_keys = [Section::Regular, Section::Contains, Section::MayContain]
            .map(|section| section.title_key());
        let error_keys = [
            OcrError::Validation(String::new()),
            OcrError::Initialization(String::new()),
            OcrError::ImageLoad(String::new()),
            OcrError::Extraction(String::new()),
            OcrError::Timeout(String::new()),
            OcrError::Unavailable,
        ]
        .map(|err| err.message_key());

        let all_keys = BOT_KEYS
            .iter()
            .copied()
            .chain(verdict_keys)
            .chain(section_keys)
            .chain(error_keys);

        for key in all_keys {
            for (language, _) in RESOURCES {
                assert!(manager.has_message(language, key), "missing '{key}' in {language}");
            }
        }
    }

    #[test]
    fn test_french_messages() {
        assert_eq!(t_lang("section-may-contain", Some("fr")), "Peut contenir :");
        assert_eq!(t_lang("verdict-unsafe", Some("fr-FR")), "Dangereux pour les chiens");
    }

    #[test]
    fn test_message_arguments() {
        assert_eq!(
            t_args_lang("barcode-line", &[("barcode", "12345678")], Some("en")),
            "Barcode: 12345678"
        );
        assert_eq!(
            t_args_lang("looking-up", &[("barcode", "12345678")], Some("fr")),
            "Recherche du code-barres 12345678..."
        );
    }

    #[test]
    fn test_unsupported_language_falls_back_to_english() {
        assert_eq!(t_lang("verdict-safe", Some("ja")), "Safe for dogs");
    }
}
