//! UI Builder module for formatting scan reports and keyboards
//!
//! Reports are rendered as Telegram HTML: harmful words in bold, moderate
//! words in italics, one status icon per ingredient.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::analysis::{IngredientReport, ScanReport};
use crate::ingredient_model::{HighlightSegment, RiskLevel};
use crate::localization::{t_args_lang, t_lang};

/// Escape text for Telegram HTML messages
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render highlight segments with their emphasis
pub fn render_segments(segments: &[HighlightSegment]) -> String {
    segments
        .iter()
        .map(|segment| {
            let text = escape_html(&segment.text);
            match segment.risk {
                RiskLevel::Harmful => format!("<b>{text}</b>"),
                RiskLevel::Moderate => format!("<i>{text}</i>"),
                RiskLevel::Safe => text,
            }
        })
        .collect()
}

fn format_ingredient_line(item: &IngredientReport) -> String {
    format!("{} {}", item.risk.icon(), render_segments(&item.segments))
}

/// Format a full scan report
pub fn format_report(report: &ScanReport, language_code: Option<&str>) -> String {
    let name = escape_html(&report.product_name);
    let mut lines = vec![format!(
        "<b>{}</b>",
        t_args_lang("product-title", &[("name", name.as_str())], language_code)
    )];

    if let Some(barcode) = &report.barcode {
        let barcode = escape_html(barcode);
        lines.push(t_args_lang(
            "barcode-line",
            &[("barcode", barcode.as_str())],
            language_code,
        ));
    }

    lines.push(format!(
        "{} <b>{}</b>",
        report.verdict.icon(),
        t_lang(report.verdict.message_key(), language_code)
    ));

    for (section, items) in report.sections() {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("<b>{}</b>", t_lang(section.title_key(), language_code)));
        lines.extend(items.iter().map(format_ingredient_line));
    }

    if report.ingredient_count() == 0 {
        lines.push(String::new());
        lines.push(format!("<i>{}</i>", t_lang("no-ingredients", language_code)));
    }

    lines.push(String::new());
    lines.push(format!("<i>{}</i>", t_lang("disclaimer", language_code)));

    lines.join("\n")
}

/// Keyboard with a link to the product page, when the report has one
pub fn create_product_keyboard(
    report: &ScanReport,
    language_code: Option<&str>,
) -> Option<InlineKeyboardMarkup> {
    let url = report.product_url.as_deref()?;
    let url = reqwest::Url::parse(url).ok()?;

    Some(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        format!("🔗 {}", t_lang("button-product-page", language_code)),
        url,
    )]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::IngredientAnalyzer;
    use crate::product_lookup::ProductInfo;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("salt & <pepper>"), "salt &amp; &lt;pepper&gt;");
    }

    #[test]
    fn test_render_segments() {
        let segments = vec![
            HighlightSegment::new("garlic", RiskLevel::Harmful),
            HighlightSegment::new(" & ", RiskLevel::Safe),
            HighlightSegment::new("salt", RiskLevel::Moderate),
        ];
        assert_eq!(render_segments(&segments), "<b>garlic</b> &amp; <i>salt</i>");
    }

    #[test]
    fn test_format_report_sections() {
        let report = IngredientAnalyzer::default()
            .analyze_text("Bites", "beef, onion powder. may contain milk");
        let text = format_report(&report, Some("en"));

        assert!(text.contains("<b>Bites</b>"));
        assert!(text.contains("Not safe for dogs"));
        assert!(text.contains("Ingredients:"));
        assert!(text.contains("May contain:"));
        assert!(!text.contains("Contains:"));
        assert!(text.contains("❌ <b>onion</b> powder."));
        assert!(text.contains("⚠️ <i>milk</i>"));
        assert!(text.contains("✅ beef"));
    }

    #[test]
    fn test_format_report_unknown() {
        let report = IngredientAnalyzer::default()
            .analyze_product(&ProductInfo::unavailable("12345678"), "https://example.org");
        let text = format_report(&report, None);

        assert!(text.contains("Cannot determine safety"));
        assert!(text.contains("Barcode: 12345678"));
        assert!(text.contains("<i>ingredients unavailable</i>"));
    }

    #[test]
    fn test_product_keyboard() {
        let analyzer = IngredientAnalyzer::default();
        let product = ProductInfo::unavailable("12345678");
        let report = analyzer.analyze_product(&product, "https://world.openfoodfacts.org");
        assert!(create_product_keyboard(&report, None).is_some());

        let pasted = analyzer.analyze_text("Pasted", "beef");
        assert!(create_product_keyboard(&pasted, None).is_none());
    }
}
