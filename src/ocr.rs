//! # OCR Module
//!
//! Reads the text of an ingredients label photo with Tesseract. Images are
//! validated first, recognition runs on a blocking worker with a timeout, and
//! transient failures are retried with backoff behind a circuit breaker.

use std::fs::File;
use std::io::Read;
use std::sync::Mutex;
use std::time::Duration;

use leptess::LepTess;
use tracing::{debug, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::instance_manager::OcrInstanceManager;
use crate::ocr_config::OcrConfig;
use crate::ocr_errors::OcrError;
use crate::recovery::calculate_retry_delay;

/// Check that the path points to a readable, non-empty file and return its size
pub fn validate_image_path(image_path: &str, config: &OcrConfig) -> Result<u64, OcrError> {
    if image_path.trim().is_empty() {
        return Err(OcrError::Validation("Image path cannot be empty".to_string()));
    }

    let metadata = std::fs::metadata(image_path).map_err(|e| {
        OcrError::Validation(format!("Cannot access image file {image_path}: {e}"))
    })?;

    if !metadata.is_file() {
        return Err(OcrError::Validation(format!("Not a file: {image_path}")));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(OcrError::Validation("Image file is empty".to_string()));
    }

    debug!(path = image_path, size, limit = config.max_file_size, "Image path validated");
    Ok(size)
}

/// Detect the image format from the first bytes of the file
pub fn detect_image_format(image_path: &str, config: &OcrConfig) -> Option<image::ImageFormat> {
    let mut file = File::open(image_path)
        .map_err(|e| debug!(path = image_path, error = %e, "Could not open image for format detection"))
        .ok()?;

    let mut buffer = vec![0; config.buffer_size];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| debug!(path = image_path, error = %e, "Could not read image header"))
        .ok()?;

    if bytes_read < config.min_format_bytes {
        debug!(
            path = image_path,
            bytes_read,
            required = config.min_format_bytes,
            "Not enough bytes to detect image format"
        );
        return None;
    }

    buffer.truncate(bytes_read);
    image::guess_format(&buffer).ok()
}

/// Whether the file is an image format Tesseract can read (PNG, JPEG, BMP, TIFF)
pub fn is_supported_image_format(image_path: &str, config: &OcrConfig) -> bool {
    match detect_image_format(image_path, config) {
        Some(format) => {
            let supported = config.format_limits.limit_for(format).is_some();
            debug!(path = image_path, ?format, supported, "Detected image format");
            supported
        }
        None => false,
    }
}

/// Validate the file and check its size against the limit of its format
///
/// Files whose format cannot be recognized are held to the general
/// `max_file_size` limit.
pub fn validate_image_with_format_limits(image_path: &str, config: &OcrConfig) -> Result<(), OcrError> {
    let size = validate_image_path(image_path, config)?;

    let format = detect_image_format(image_path, config);
    let limit = format
        .and_then(|format| config.format_limits.limit_for(format))
        .unwrap_or(config.max_file_size);

    if size > limit {
        return Err(OcrError::Validation(format!(
            "Image file too large: {size} bytes (limit {limit} bytes for {format:?})"
        )));
    }

    Ok(())
}

/// Trim recognized lines, drop blank ones and join the rest with newlines
pub fn normalize_recognized_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the text of a label photo
///
/// Retries timeouts and extraction failures up to `recovery.max_retries`
/// times. Every final failure is recorded on the circuit breaker, and while the
/// breaker is open calls fail with [`OcrError::Unavailable`].
pub async fn extract_text_from_image(
    image_path: &str,
    config: &OcrConfig,
    instance_manager: &OcrInstanceManager,
    circuit_breaker: &CircuitBreaker,
) -> Result<String, OcrError> {
    if circuit_breaker.is_open() {
        warn!(path = image_path, "OCR circuit breaker is open, rejecting request");
        return Err(OcrError::Unavailable);
    }

    validate_image_with_format_limits(image_path, config)?;

    let timeout = Duration::from_secs(config.recovery.operation_timeout_secs);
    let mut attempt = 0;

    loop {
        match run_extraction(image_path, config, instance_manager, timeout).await {
            Ok(text) => {
                circuit_breaker.record_success();
                info!(path = image_path, chars = text.len(), attempt, "OCR extraction completed");
                return Ok(text);
            }
            Err(e) if e.is_retryable() && attempt < config.recovery.max_retries => {
                attempt += 1;
                let delay = calculate_retry_delay(attempt, &config.recovery);
                warn!(path = image_path, error = %e, attempt, delay_ms = delay, "OCR attempt failed, retrying");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => {
                circuit_breaker.record_failure();
                warn!(path = image_path, error = %e, attempt, "OCR extraction failed");
                return Err(e);
            }
        }
    }
}

async fn run_extraction(
    image_path: &str,
    config: &OcrConfig,
    instance_manager: &OcrInstanceManager,
    timeout: Duration,
) -> Result<String, OcrError> {
    let instance = instance_manager.get_instance(config)?;
    let path = image_path.to_string();

    match run_blocking_with_timeout(timeout, move || recognize(&instance, &path)).await {
        Ok(result) => result,
        Err(e) => {
            // A stuck or panicked job may still hold the instance lock
            warn!(languages = %config.languages, error = %e, "Discarding OCR instance");
            instance_manager.remove_instance(&config.languages);
            Err(e)
        }
    }
}

/// Run a blocking job on the blocking pool with a time limit
///
/// An error means the job panicked or is still running; in the latter case it
/// keeps whatever it captured until it finishes.
pub async fn run_blocking_with_timeout<T, F>(timeout: Duration, job: F) -> Result<T, OcrError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => Err(OcrError::Extraction(format!("OCR worker failed: {join_error}"))),
        Err(_) => Err(OcrError::Timeout(format!(
            "OCR did not finish within {} ms",
            timeout.as_millis()
        ))),
    }
}

fn recognize(instance: &Mutex<LepTess>, image_path: &str) -> Result<String, OcrError> {
    let mut tess = instance
        .lock()
        .map_err(|_| OcrError::Extraction("OCR instance lock poisoned".to_string()))?;

    tess.set_image(image_path)
        .map_err(|e| OcrError::ImageLoad(format!("Failed to load image for OCR: {e}")))?;

    let text = tess
        .get_utf8_text()
        .map_err(|e| OcrError::Extraction(format!("Failed to extract text from image: {e}")))?;

    Ok(normalize_recognized_lines(&text))
}
