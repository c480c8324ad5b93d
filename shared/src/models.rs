//! Shared data models.
//!
//! These are the stable response shapes every proxy normalizes into.

use serde::{Deserialize, Serialize};

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    /// Degrees Celsius
    pub temperature: i32,
    /// Degrees Celsius
    pub feels_like: i32,
    /// Percent
    pub humidity: i32,
    pub description: String,
    /// Metres per second
    pub wind_speed: f64,
    /// hPa
    pub pressure: i32,
}

/// Outcome of converting an amount between two currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    /// Rounded to two decimal places
    pub converted: f64,
    /// Fixed four-decimal rendering of the rate
    pub rate: String,
}

/// A single motivational quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            error: "Internal server error".to_string(),
            details: Some(details.into()),
        }
    }
}
