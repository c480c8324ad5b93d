//! Shared library for the info portal proxy Lambda functions.
//!
//! Each endpoint (weather, currency, quotes) is a stateless [`Proxy`] that either
//! calls one third-party API or, when no upstream is configured, answers with
//! mock data. [`http::serve`] wraps any proxy with preflight handling, CORS
//! headers and the error-to-status mapping.

pub mod config;
pub mod currency;
pub mod error;
pub mod http;
pub mod models;
pub mod proxy;
pub mod quotes;
pub mod weather;

pub use config::Config;
pub use currency::{ConversionQuery, CurrencyProxy};
pub use error::{Error, Result};
pub use models::{ConversionResult, ErrorBody, Quote, WeatherResult};
pub use proxy::{MockRng, Proxy};
pub use quotes::QuotesProxy;
pub use weather::{WeatherProxy, WeatherQuery};
