//! The seam every endpoint implements.

use async_trait::async_trait;
use lambda_http::{Request, RequestExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

use crate::{Error, Result};

/// A stateless endpoint that validates its query, then either calls one
/// upstream API or synthesizes a mock answer.
#[async_trait]
pub trait Proxy: Send + Sync {
    /// Validated request
    type Query: Send;
    /// Normalized response body
    type Output: Serialize + Send;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Validate the request's query string into a typed query.
    fn parse(event: &Request) -> Result<Self::Query>;

    /// Produce the response for an already validated query.
    async fn handle(&self, query: Self::Query) -> Result<Self::Output>;

    /// Whether an upstream credential or endpoint is configured.
    fn is_live(&self) -> bool;
}

/// Seedable random source shared by the mock generators.
#[derive(Debug)]
pub struct MockRng(Mutex<StdRng>);

impl MockRng {
    pub fn from_os() -> Self {
        Self(Mutex::new(StdRng::from_os_rng()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    /// Borrow the generator. The guard must not be held across an await.
    pub fn lock(&self) -> Result<MutexGuard<'_, StdRng>> {
        self.0
            .lock()
            .map_err(|_| Error::Internal("Mock data generator is unavailable".to_string()))
    }
}

/// Read a query parameter, treating blank values as absent.
pub(crate) fn param<'a>(event: &'a Request, name: &str) -> Option<&'a str> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Round half away from zero to the given number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashMap;

    #[test]
    fn test_param_treats_blank_as_missing() {
        let event = lambda_http::http::Request::builder()
            .uri("/currency")
            .body(lambda_http::Body::Empty)
            .unwrap()
            .with_query_string_parameters(HashMap::from([
                ("city".to_string(), "  ".to_string()),
                ("from".to_string(), " usd ".to_string()),
            ]));
        assert_eq!(param(&event, "city"), None);
        assert_eq!(param(&event, "from"), Some("usd"));
        assert_eq!(param(&event, "to"), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.000000000000002, 2), 12.0);
        assert_eq!(round_to(7.345, 1), 7.3);
        assert_eq!(round_to(0.0125, 4), 0.0125);
        assert_eq!(round_to(83.456789, 2), 83.46);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = MockRng::seeded(7);
        let b = MockRng::seeded(7);
        let first: Vec<u32> = (0..5).map(|_| a.lock().unwrap().random_range(0..1000)).collect();
        let second: Vec<u32> = (0..5).map(|_| b.lock().unwrap().random_range(0..1000)).collect();
        assert_eq!(first, second);
    }
}
