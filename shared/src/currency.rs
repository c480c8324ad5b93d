//! Currency proxy backed by ExchangeRate-API pair conversion.

use async_trait::async_trait;
use lambda_http::Request;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::ConversionResult;
use crate::proxy::{param, round_to, Proxy};
use crate::{Config, Error, Result};

/// Fixed rates served when no ExchangeRate-API key is configured.
///
/// Directed pairs only; anything else converts at 1.
pub const MOCK_RATES: [(&str, &str, f64); 6] = [
    ("INR", "USD", 0.012),
    ("INR", "EUR", 0.011),
    ("USD", "INR", 83.0),
    ("EUR", "INR", 90.0),
    ("USD", "EUR", 0.92),
    ("EUR", "USD", 1.09),
];

pub const DEFAULT_FROM: &str = "INR";
pub const DEFAULT_TO: &str = "USD";

const INVALID_AMOUNT: &str = "Valid amount is required";
const CONVERSION_FAILED: &str = "Currency conversion failed";

/// Rate for a directed pair from the mock table.
pub fn mock_rate(from: &str, to: &str) -> f64 {
    MOCK_RATES
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, rate)| *rate)
        .unwrap_or(1.0)
}

/// Render a rate the way clients expect it: exactly four decimals.
pub fn format_rate(rate: f64) -> String {
    format!("{:.4}", rate)
}

/// Validated conversion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionQuery {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionQuery {
    pub fn new(amount: Option<&str>, from: Option<&str>, to: Option<&str>) -> Result<Self> {
        let amount = amount
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(|| Error::Validation(INVALID_AMOUNT.to_string()))?;

        Ok(Self {
            amount,
            from: normalize_code(from, DEFAULT_FROM),
            to: normalize_code(to, DEFAULT_TO),
        })
    }

    /// Convert against the mock rate table.
    pub fn convert_mock(&self) -> ConversionResult {
        let rate = mock_rate(&self.from, &self.to);

        ConversionResult {
            from: self.from.clone(),
            to: self.to.clone(),
            amount: self.amount,
            converted: round_to(self.amount * rate, 2),
            rate: format_rate(rate),
        }
    }
}

fn normalize_code(code: Option<&str>, default: &str) -> String {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default)
        .to_uppercase()
}

/// ExchangeRate-API pair conversion payload.
///
/// Error payloads carry only `result` and `error-type`, so the success
/// fields are optional until `result` has been checked.
#[derive(Debug, Deserialize)]
struct PairResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    target_code: Option<String>,
    conversion_rate: Option<f64>,
    conversion_result: Option<f64>,
}

/// Proxy for `GET /currency?amount=<n>&from=<code>&to=<code>`.
#[derive(Debug)]
pub struct CurrencyProxy {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl CurrencyProxy {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            api_key: config.exchange_api_key.clone(),
            base_url: config.exchange_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert an amount, live or against the mock table depending on configuration.
    pub async fn convert(&self, query: &ConversionQuery) -> Result<ConversionResult> {
        match self.api_key.as_deref() {
            Some(key) => self.fetch_pair(query, key).await,
            None => {
                debug!(from = %query.from, to = %query.to, "No exchange key configured, using mock rates");
                Ok(query.convert_mock())
            }
        }
    }

    async fn fetch_pair(&self, query: &ConversionQuery, api_key: &str) -> Result<ConversionResult> {
        let amount = query.amount.to_string();
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::Internal(format!("Invalid exchange base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Internal("Exchange base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                api_key,
                "pair",
                query.from.as_str(),
                query.to.as_str(),
                amount.as_str(),
            ]);

        let response = self.http.get(url).send().await.map_err(|e| {
            warn!(from = %query.from, to = %query.to, timeout = e.is_timeout(), "Exchange request failed");
            Error::from_transport(e, 400, CONVERSION_FAILED)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(from = %query.from, to = %query.to, status = %status, "Exchange conversion failed");
            return Err(Error::upstream(400, CONVERSION_FAILED));
        }

        let parsed: PairResponse = response
            .json()
            .await
            .map_err(|e| Error::from_transport(e, 400, CONVERSION_FAILED))?;
        if parsed.result.as_deref().is_some_and(|r| r != "success") {
            warn!(
                from = %query.from,
                to = %query.to,
                error_type = ?parsed.error_type,
                "Exchange reported failure"
            );
            return Err(Error::upstream(400, CONVERSION_FAILED));
        }

        let (Some(from), Some(to), Some(rate), Some(converted)) = (
            parsed.base_code,
            parsed.target_code,
            parsed.conversion_rate,
            parsed.conversion_result,
        ) else {
            return Err(Error::Internal(
                "Exchange response is missing conversion fields".to_string(),
            ));
        };

        Ok(ConversionResult {
            from,
            to,
            amount: query.amount,
            converted: round_to(converted, 2),
            rate: format_rate(rate),
        })
    }
}

#[async_trait]
impl Proxy for CurrencyProxy {
    type Query = ConversionQuery;
    type Output = ConversionResult;

    const NAME: &'static str = "currency";

    fn parse(event: &Request) -> Result<ConversionQuery> {
        ConversionQuery::new(
            param(event, "amount"),
            param(event, "from"),
            param(event, "to"),
        )
    }

    async fn handle(&self, query: ConversionQuery) -> Result<ConversionResult> {
        self.convert(&query).await
    }

    fn is_live(&self) -> bool {
        self.api_key.is_some()
    }
}
