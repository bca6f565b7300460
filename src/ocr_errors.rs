//! # OCR Error Types Module
//!
//! Failure modes of reading text from a label photo.

/// Custom error types for OCR operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrError {
    /// The file is missing, empty, too large or not an image
    Validation(String),
    /// Tesseract could not be initialized for the configured languages
    Initialization(String),
    /// Tesseract could not load the image
    ImageLoad(String),
    /// Text extraction failed
    Extraction(String),
    /// An attempt exceeded the operation timeout
    Timeout(String),
    /// Too many recent failures; the circuit breaker is open
    Unavailable,
}

impl OcrError {
    /// Localization key of the message shown to the user
    pub fn message_key(&self) -> &'static str {
        match self {
            OcrError::Validation(_) => "error-validation",
            OcrError::Initialization(_) => "error-ocr-initialization",
            OcrError::ImageLoad(_) => "error-image-load",
            OcrError::Extraction(_) => "error-ocr-extraction",
            OcrError::Timeout(_) => "error-ocr-timeout",
            OcrError::Unavailable => "error-ocr-unavailable",
        }
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, OcrError::Extraction(_) | OcrError::Timeout(_))
    }
}

impl std::fmt::Display for OcrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrError::Validation(msg) => write!(f, "Validation error: {msg}"),
            OcrError::Initialization(msg) => write!(f, "Initialization error: {msg}"),
            OcrError::ImageLoad(msg) => write!(f, "Image load error: {msg}"),
            OcrError::Extraction(msg) => write!(f, "Extraction error: {msg}"),
            OcrError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            OcrError::Unavailable => write!(f, "OCR temporarily unavailable"),
        }
    }
}

impl std::error::Error for OcrError {}
