//! # Product Lookup Module
//!
//! Resolves a barcode to a product name and ingredients text through the Open
//! Food Facts API. The response decoding is pure and tested without a network;
//! [`ProductLookupClient`] adds the HTTP call, per-attempt timeout, retries and
//! a circuit breaker.
//!
//! Missing data never fails a lookup: a product without a name becomes
//! [`UNKNOWN_PRODUCT`] and one without ingredients becomes
//! [`INGREDIENTS_UNAVAILABLE`].

use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::ingredient_model::{INGREDIENTS_UNAVAILABLE, UNKNOWN_PRODUCT};
use crate::recovery::{calculate_retry_delay, RecoveryConfig};

pub const DEFAULT_API_BASE_URL: &str = "https://world.openfoodfacts.org";

lazy_static! {
    static ref BARCODE_PATTERN: Regex =
        Regex::new(r"^[0-9A-Za-z]{4,32}$").expect("barcode pattern is valid");
}

/// Check a user-supplied barcode and return it trimmed
///
/// # Examples
///
/// ```
/// use pawcheck::product_lookup::validate_barcode;
///
/// assert_eq!(validate_barcode(" 3017620422003 "), Some("3017620422003"));
/// assert_eq!(validate_barcode("beef, rice"), None);
/// ```
pub fn validate_barcode(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    BARCODE_PATTERN.is_match(trimmed).then_some(trimmed)
}

/// What the lookup knows about a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub barcode: String,
    pub name: String,
    pub ingredients_text: String,
}

impl ProductInfo {
    /// Placeholder product used when a lookup fails
    pub fn unavailable(barcode: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            name: UNKNOWN_PRODUCT.to_string(),
            ingredients_text: INGREDIENTS_UNAVAILABLE.to_string(),
        }
    }

    /// Whether real ingredients text was found
    pub fn has_ingredients(&self) -> bool {
        self.ingredients_text != INGREDIENTS_UNAVAILABLE
    }

    /// Product page on the given site
    pub fn product_url(&self, base_url: &str) -> String {
        format!("{}/product/{}", base_url.trim_end_matches('/'), self.barcode)
    }
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    product: Option<ProductFields>,
}

#[derive(Debug, Deserialize)]
struct ProductFields {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    ingredients_text: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode an API response body into a [`ProductInfo`]
///
/// Blank or absent fields fall back to the placeholders.
pub fn decode_product_response(barcode: &str, body: &str) -> Result<ProductInfo, LookupError> {
    let response: ProductResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let Some(product) = response.product else {
        debug!(barcode, "Response carries no product");
        return Ok(ProductInfo::unavailable(barcode));
    };

    Ok(ProductInfo {
        barcode: barcode.to_string(),
        name: non_blank(product.product_name).unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        ingredients_text: non_blank(product.ingredients_text)
            .unwrap_or_else(|| INGREDIENTS_UNAVAILABLE.to_string()),
    })
}

/// Product lookup failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The input is not a barcode
    InvalidBarcode(String),
    /// Network or HTTP failure
    Transport(String),
    /// Non-success HTTP status
    Status(u16),
    /// The body is not the expected JSON
    Decode(String),
    /// An attempt exceeded the timeout
    Timeout(u64),
    /// Too many recent failures; the circuit breaker is open
    Unavailable,
}

impl LookupError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Transport(_) | LookupError::Timeout(_) => true,
            LookupError::Status(code) => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::InvalidBarcode(input) => write!(f, "Invalid barcode: '{input}'"),
            LookupError::Transport(msg) => write!(f, "Transport error: {msg}"),
            LookupError::Status(code) => write!(f, "Unexpected HTTP status {code}"),
            LookupError::Decode(msg) => write!(f, "Decode error: {msg}"),
            LookupError::Timeout(secs) => write!(f, "Lookup did not finish within {secs} seconds"),
            LookupError::Unavailable => write!(f, "Product lookup temporarily unavailable"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => LookupError::Status(status.as_u16()),
            None => LookupError::Transport(err.to_string()),
        }
    }
}

/// Settings for [`ProductLookupClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub base_url: String,
    pub recovery: RecoveryConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            recovery: RecoveryConfig {
                max_retries: 2,
                base_retry_delay_ms: 500,
                max_retry_delay_ms: 4000,
                operation_timeout_secs: 10,
                ..RecoveryConfig::default()
            },
        }
    }
}

/// HTTP client for the product API
#[derive(Clone)]
pub struct ProductLookupClient {
    http: reqwest::Client,
    config: LookupConfig,
    breaker: Arc<CircuitBreaker>,
}

impl ProductLookupClient {
    pub fn new(config: LookupConfig) -> Self {
        let breaker = Arc::new(CircuitBreaker::named("product-lookup", config.recovery.clone()));
        Self {
            http: reqwest::Client::new(),
            config,
            breaker,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// URL of the JSON document for a barcode
    pub fn product_endpoint(&self, barcode: &str) -> String {
        format!(
            "{}/api/v0/product/{}.json",
            self.config.base_url.trim_end_matches('/'),
            barcode
        )
    }

    /// Look a barcode up, retrying transient failures
    pub async fn lookup(&self, barcode: &str) -> Result<ProductInfo, LookupError> {
        let barcode = validate_barcode(barcode)
            .ok_or_else(|| LookupError::InvalidBarcode(barcode.to_string()))?;

        if self.breaker.is_open() {
            warn!(barcode, "Product lookup circuit breaker is open, rejecting request");
            return Err(LookupError::Unavailable);
        }

        let recovery = &self.config.recovery;
        let mut attempt = 0;

        loop {
            match self.fetch(barcode).await {
                Ok(product) => {
                    self.breaker.record_success();
                    info!(
                        barcode,
                        name = %product.name,
                        has_ingredients = product.has_ingredients(),
                        attempt,
                        "Product lookup completed"
                    );
                    return Ok(product);
                }
                Err(e) if e.is_retryable() && attempt < recovery.max_retries => {
                    attempt += 1;
                    let delay = calculate_retry_delay(attempt, recovery);
                    warn!(barcode, error = %e, attempt, delay_ms = delay, "Product lookup failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    self.breaker.record_failure();
                    warn!(barcode, error = %e, attempt, "Product lookup failed");
                    return Err(e);
                }
            }
        }
    }

    /// Look a barcode up, substituting the placeholder product on failure
    pub async fn lookup_or_placeholder(&self, barcode: &str) -> ProductInfo {
        match self.lookup(barcode).await {
            Ok(product) => product,
            Err(e) => {
                debug!(barcode, error = %e, "Using placeholder product");
                ProductInfo::unavailable(barcode.trim())
            }
        }
    }

    async fn fetch(&self, barcode: &str) -> Result<ProductInfo, LookupError> {
        let url = self.product_endpoint(barcode);
        let timeout_secs = self.config.recovery.operation_timeout_secs;
        debug!(%url, "Requesting product");

        let request = async {
            let response = self.http.get(&url).send().await?.error_for_status()?;
            let body = response.text().await?;
            decode_product_response(barcode, &body)
        };

        tokio::time::timeout(Duration::from_secs(timeout_secs), request)
            .await
            .map_err(|_| LookupError::Timeout(timeout_secs))?
    }
}
