//! # Configuration Module
//!
//! Application settings read from the environment (a `.env` file is loaded by
//! the binary before this runs).
//!
//! | Variable | Default |
//! |---|---|
//! | `TELEGRAM_BOT_TOKEN` | required |
//! | `PRODUCT_API_BASE_URL` | `https://world.openfoodfacts.org` |
//! | `OCR_LANGUAGES` | `eng+fra` |
//! | `LOOKUP_TIMEOUT_SECS` | `10` |
//! | `LOOKUP_MAX_RETRIES` | `2` |
//! | `REPORT_CACHE_CAPACITY` | `256` |
//! | `EXTRA_HARMFUL_TERMS` | empty, comma-separated |
//! | `EXTRA_MODERATE_TERMS` | empty, comma-separated |

use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};
use crate::ocr_config::{OcrConfig, DEFAULT_LANGUAGES};
use crate::product_lookup::LookupConfig;
use crate::term_lists::TermLists;
use crate::text_processing::split_top_level;

pub const DEFAULT_REPORT_CACHE_CAPACITY: usize = 256;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub lookup: LookupConfig,
    pub ocr: OcrConfig,
    pub report_cache_capacity: usize,
    pub extra_harmful_terms: Vec<String>,
    pub extra_moderate_terms: Vec<String>,
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build the configuration from a map of variables
    pub fn from_vars(vars: HashMap<String, String>) -> AppResult<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .ok_or_else(|| AppError::Config("TELEGRAM_BOT_TOKEN must be set".to_string()))?
            .to_string();

        let mut lookup = LookupConfig::default();
        if let Some(base_url) = get("PRODUCT_API_BASE_URL") {
            lookup.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(value) = get("LOOKUP_TIMEOUT_SECS") {
            lookup.recovery.operation_timeout_secs = parse_number("LOOKUP_TIMEOUT_SECS", value)?;
        }
        if let Some(value) = get("LOOKUP_MAX_RETRIES") {
            lookup.recovery.max_retries = parse_number("LOOKUP_MAX_RETRIES", value)?;
        }

        let ocr = OcrConfig {
            languages: get("OCR_LANGUAGES").unwrap_or(DEFAULT_LANGUAGES).to_string(),
            ..OcrConfig::default()
        };

        let report_cache_capacity = match get("REPORT_CACHE_CAPACITY") {
            Some(value) => parse_number("REPORT_CACHE_CAPACITY", value)?,
            None => DEFAULT_REPORT_CACHE_CAPACITY,
        };

        Ok(Self {
            bot_token,
            lookup,
            ocr,
            report_cache_capacity,
            extra_harmful_terms: get("EXTRA_HARMFUL_TERMS").map(split_top_level).unwrap_or_default(),
            extra_moderate_terms: get("EXTRA_MODERATE_TERMS").map(split_top_level).unwrap_or_default(),
        })
    }

    /// Built-in term lists extended with the configured extra terms
    pub fn term_lists(&self) -> TermLists {
        TermLists::builtin_with_extras(&self.extra_harmful_terms, &self.extra_moderate_terms)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got '{value}'")))
}
