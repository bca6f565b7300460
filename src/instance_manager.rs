//! # OCR Instance Manager Module
//!
//! Keeps one Tesseract instance per language configuration so that label photos
//! do not pay the engine start-up cost on every scan.

use leptess::LepTess;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::ocr_config::OcrConfig;
use crate::ocr_errors::OcrError;

/// Shared Tesseract instance
pub type SharedTesseract = Arc<Mutex<LepTess>>;

/// Thread-safe pool of Tesseract instances keyed by language string
#[derive(Default)]
pub struct OcrInstanceManager {
    instances: Mutex<HashMap<String, SharedTesseract>>,
}

impl OcrInstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the instance for `config.languages`, creating it on first use
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::Initialization`] when Tesseract cannot be started,
    /// e.g. because the language data is not installed.
    pub fn get_instance(&self, config: &OcrConfig) -> Result<SharedTesseract, OcrError> {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(instance) = instances.get(&config.languages) {
            return Ok(Arc::clone(instance));
        }

        info!(languages = %config.languages, "Creating new OCR instance");
        let tess = LepTess::new(None, &config.languages).map_err(|e| {
            OcrError::Initialization(format!(
                "Failed to initialize Tesseract for '{}': {}",
                config.languages, e
            ))
        })?;

        let instance = Arc::new(Mutex::new(tess));
        instances.insert(config.languages.clone(), Arc::clone(&instance));
        Ok(instance)
    }

    /// Drop the instance for a language string, e.g. after it failed repeatedly
    pub fn remove_instance(&self, languages: &str) {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if instances.remove(languages).is_some() {
            info!(languages, "Removed OCR instance");
        }
    }

    /// Number of cached instances
    pub fn instance_count(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
