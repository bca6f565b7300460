//! Bot module for handling Telegram interactions
//!
//! - `message_handler`: Handles incoming text, photo, and document messages
//! - `ui_builder`: Formats scan reports and creates keyboards

pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use crate::analysis::{IngredientAnalyzer, ReportCache};
use crate::circuit_breaker::CircuitBreaker;
use crate::config::AppConfig;
use crate::instance_manager::OcrInstanceManager;
use crate::ocr_config::OcrConfig;
use crate::product_lookup::ProductLookupClient;

pub use message_handler::message_handler;

/// Services shared by every update handler
pub struct BotContext {
    pub analyzer: IngredientAnalyzer,
    pub lookup: ProductLookupClient,
    pub report_cache: ReportCache,
    pub ocr_config: OcrConfig,
    pub ocr_instances: OcrInstanceManager,
    pub ocr_breaker: CircuitBreaker,
}

impl BotContext {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            analyzer: IngredientAnalyzer::new(Arc::new(config.term_lists())),
            lookup: ProductLookupClient::new(config.lookup.clone()),
            report_cache: ReportCache::new(config.report_cache_capacity),
            ocr_config: config.ocr.clone(),
            ocr_instances: OcrInstanceManager::new(),
            ocr_breaker: CircuitBreaker::named("ocr", config.ocr.recovery.clone()),
        }
    }
}
