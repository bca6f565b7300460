//! # PawCheck
//!
//! A Telegram bot that tells dog owners whether a food product is safe for
//! their dog. Products are found by barcode, pasted as an ingredients list or
//! read from a label photo with OCR; the ingredients statement is parsed into
//! regular, "contains" and "may contain" items and every item is classified
//! against curated harmful and moderate-risk term lists.

pub mod analysis;
pub mod bot;
pub mod circuit_breaker;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod highlighter;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod instance_manager;
pub mod localization;
pub mod ocr;
pub mod ocr_config;
pub mod ocr_errors;
pub mod product_lookup;
pub mod recovery;
pub mod term_lists;
pub mod text_processing;
