//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::analysis::ScanReport;
use crate::localization::{t_args_lang, t_lang};
use crate::ocr_errors::OcrError;
use crate::product_lookup::validate_barcode;
use crate::text_processing::clean_recognized_text;

use super::ui_builder::{create_product_keyboard, format_report};
use super::BotContext;

/// What a text message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRequest<'a> {
    Start,
    Help,
    Barcode(&'a str),
    Ingredients(&'a str),
}

/// Decide how to treat an incoming text
///
/// Commands may carry a bot mention (`/help@PawCheckBot`). Only an all-digit
/// code of at least [`MIN_CHAT_BARCODE_DIGITS`] digits is looked up, so a single
/// pasted word or an additive code such as "E330" is analyzed as text.
pub fn classify_text(text: &str) -> TextRequest<'_> {
    let command = text.trim().split(['@', ' ']).next().unwrap_or_default();
    match command {
        "/start" => TextRequest::Start,
        "/help" => TextRequest::Help,
        _ => match validate_barcode(text) {
            Some(barcode) if is_retail_barcode(barcode) => TextRequest::Barcode(barcode),
            _ => TextRequest::Ingredients(text),
        },
    }
}

/// Shortest retail barcode (EAN-8)
pub const MIN_CHAT_BARCODE_DIGITS: usize = 8;

fn is_retail_barcode(code: &str) -> bool {
    code.len() >= MIN_CHAT_BARCODE_DIGITS && code.chars().all(|c| c.is_ascii_digit())
}

fn user_language(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_deref())
}

/// Download a Telegram file into a temporary file
pub async fn download_file(bot: &Bot, file_id: teloxide::types::FileId) -> Result<NamedTempFile> {
    let file = bot.get_file(file_id).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    let mut temp_file = NamedTempFile::new()?;
    temp_file.as_file_mut().write_all(&bytes)?;
    Ok(temp_file)
}

async fn send_report(bot: &Bot, chat_id: ChatId, report: &ScanReport, language_code: Option<&str>) -> Result<()> {
    let mut request = bot
        .send_message(chat_id, format_report(report, language_code))
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = create_product_keyboard(report, language_code) {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

/// Localized message for an OCR failure
pub fn ocr_error_message(err: &OcrError, language_code: Option<&str>) -> String {
    match err {
        OcrError::Validation(details) => {
            t_args_lang(err.message_key(), &[("details", details.as_str())], language_code)
        }
        _ => t_lang(err.message_key(), language_code),
    }
}

async fn handle_barcode(
    bot: &Bot,
    chat_id: ChatId,
    barcode: &str,
    ctx: &BotContext,
    language_code: Option<&str>,
) -> Result<()> {
    info!(user_id = %chat_id, barcode, "Barcode lookup requested");

    if let Some(report) = ctx.report_cache.get(barcode) {
        debug!(user_id = %chat_id, barcode, "Serving cached report");
        return send_report(bot, chat_id, &report, language_code).await;
    }

    bot.send_message(
        chat_id,
        t_args_lang("looking-up", &[("barcode", barcode)], language_code),
    )
    .await?;

    let product = ctx.lookup.lookup_or_placeholder(barcode).await;
    let report = ctx.analyzer.analyze_product(&product, ctx.lookup.base_url());

    // Placeholder products are not cached so a later lookup can succeed
    if product.has_ingredients() {
        ctx.report_cache.insert(barcode, report.clone());
    }

    send_report(bot, chat_id, &report, language_code).await
}

async fn handle_text_message(bot: &Bot, msg: &Message, ctx: &BotContext) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let language_code = user_language(msg);
    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    match classify_text(text) {
        TextRequest::Start => {
            let welcome_message = format!(
                "🐾 <b>{}</b>\n\n{}\n\n{}\n{}\n{}\n\n{}",
                t_lang("welcome-title", language_code),
                t_lang("welcome-description", language_code),
                t_lang("welcome-barcode", language_code),
                t_lang("welcome-text", language_code),
                t_lang("welcome-photo", language_code),
                t_lang("welcome-help", language_code)
            );
            bot.send_message(msg.chat.id, welcome_message)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        TextRequest::Help => {
            let help_message = [
                format!("<b>{}</b>", t_lang("help-title", language_code)),
                t_lang("help-barcode", language_code),
                t_lang("help-text", language_code),
                t_lang("help-photo", language_code),
                format!(
                    "{}\n{}\n{}\n{}",
                    t_lang("help-legend", language_code),
                    t_lang("help-legend-harmful", language_code),
                    t_lang("help-legend-moderate", language_code),
                    t_lang("help-legend-safe", language_code)
                ),
                format!("<i>{}</i>", t_lang("help-note", language_code)),
            ]
            .join("\n\n");
            bot.send_message(msg.chat.id, help_message)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        TextRequest::Barcode(barcode) => {
            handle_barcode(bot, msg.chat.id, barcode, ctx, language_code).await?;
        }
        TextRequest::Ingredients(ingredients) => {
            let report = ctx
                .analyzer
                .analyze_text(&t_lang("pasted-ingredients", language_code), ingredients);
            send_report(bot, msg.chat.id, &report, language_code).await?;
        }
    }
    Ok(())
}

/// Download an image, read its text and reply with the report
pub async fn download_and_process_image(
    bot: &Bot,
    file_id: teloxide::types::FileId,
    chat_id: ChatId,
    progress_message: &str,
    ctx: &BotContext,
    language_code: Option<&str>,
) -> Result<()> {
    let temp_file = match download_file(bot, file_id).await {
        Ok(file) => file,
        Err(e) => {
            error!(user_id = %chat_id, error = %e, "Failed to download image for user");
            bot.send_message(chat_id, t_lang("error-download-failed", language_code))
                .await?;
            return Err(e);
        }
    };
    let temp_path = temp_file.path().to_string_lossy().to_string();
    debug!(user_id = %chat_id, temp_path = %temp_path, "Image downloaded successfully");

    bot.send_message(chat_id, progress_message).await?;

    if !crate::ocr::is_supported_image_format(&temp_path, &ctx.ocr_config) {
        warn!(user_id = %chat_id, "Unsupported image format rejected");
        bot.send_message(chat_id, t_lang("error-unsupported-format", language_code))
            .await?;
        return Ok(());
    }

    let extracted = crate::ocr::extract_text_from_image(
        &temp_path,
        &ctx.ocr_config,
        &ctx.ocr_instances,
        &ctx.ocr_breaker,
    )
    .await;

    // The temporary file is removed when `temp_file` drops
    drop(temp_file);

    match extracted {
        Ok(raw_text) => {
            let ingredients = clean_recognized_text(&raw_text);
            if ingredients.trim().is_empty() {
                warn!(user_id = %chat_id, "OCR extraction returned no ingredients text");
                bot.send_message(chat_id, t_lang("error-no-text-found", language_code))
                    .await?;
                return Ok(());
            }

            info!(
                user_id = %chat_id,
                chars_extracted = raw_text.len(),
                "OCR extraction completed successfully"
            );
            let report = ctx
                .analyzer
                .analyze_text(&t_lang("scanned-label", language_code), &ingredients);
            send_report(bot, chat_id, &report, language_code).await
        }
        Err(e) => {
            error!(user_id = %chat_id, error = %e, "OCR processing failed for user");
            bot.send_message(chat_id, ocr_error_message(&e, language_code))
                .await?;
            Ok(())
        }
    }
}

async fn handle_photo_message(bot: &Bot, msg: &Message, ctx: &BotContext) -> Result<()> {
    let language_code = user_language(msg);
    debug!(user_id = %msg.chat.id, "Received photo message from user");

    if let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) {
        download_and_process_image(
            bot,
            largest_photo.file.id.clone(),
            msg.chat.id,
            &t_lang("processing-photo", language_code),
            ctx,
            language_code,
        )
        .await?;
    }
    Ok(())
}

async fn handle_document_message(bot: &Bot, msg: &Message, ctx: &BotContext) -> Result<()> {
    let language_code = user_language(msg);
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    match &doc.mime_type {
        Some(mime_type) if mime_type.to_string().starts_with("image/") => {
            debug!(user_id = %msg.chat.id, mime_type = %mime_type, "Received image document from user");
            download_and_process_image(
                bot,
                doc.file.id.clone(),
                msg.chat.id,
                &t_lang("processing-document", language_code),
                ctx,
                language_code,
            )
            .await?;
        }
        Some(mime_type) => {
            debug!(user_id = %msg.chat.id, mime_type = %mime_type, "Received non-image document from user");
            bot.send_message(msg.chat.id, t_lang("error-unsupported-format", language_code))
                .await?;
        }
        None => {
            debug!(user_id = %msg.chat.id, "Received document without mime type from user");
            bot.send_message(msg.chat.id, t_lang("error-no-mime-type", language_code))
                .await?;
        }
    }
    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");
    bot.send_message(msg.chat.id, t_lang("unsupported-message", user_language(msg)))
        .await?;
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, &ctx).await?;
    } else if msg.photo().is_some() {
        handle_photo_message(&bot, &msg, &ctx).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg, &ctx).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
