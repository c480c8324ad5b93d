//! Quotes proxy: a built-in collection, or a configured quote service.

use async_trait::async_trait;
use lambda_http::Request;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Quote;
use crate::proxy::{MockRng, Proxy};
use crate::{Config, Error, Result};

/// Quotes served when no quote service is configured.
pub const BUILTIN_QUOTES: [(&str, &str); 12] = [
    ("The only way to do great work is to love what you do.", "Steve Jobs"),
    ("It always seems impossible until it's done.", "Nelson Mandela"),
    ("Believe you can and you're halfway there.", "Theodore Roosevelt"),
    ("Act as if what you do makes a difference. It does.", "William James"),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    ("The future belongs to those who believe in the beauty of their dreams.", "Eleanor Roosevelt"),
    ("Don't watch the clock; do what it does. Keep going.", "Sam Levenson"),
    ("Quality is not an act, it is a habit.", "Aristotle"),
    (
        "What you get by achieving your goals is not as important as what you become by achieving your goals.",
        "Zig Ziglar",
    ),
    ("Start where you are. Use what you have. Do what you can.", "Arthur Ashe"),
    ("Hardships often prepare ordinary people for an extraordinary destiny.", "C.S. Lewis"),
    ("You are never too old to set another goal or to dream a new dream.", "C.S. Lewis"),
];

/// One quote as returned by common quote services.
#[derive(Debug, Deserialize)]
struct UpstreamQuote {
    #[serde(alias = "q", alias = "content", alias = "quote")]
    text: String,
    #[serde(default, alias = "a")]
    author: Option<String>,
}

/// Either a bare quote or a list of them (first one wins).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpstreamPayload {
    Many(Vec<UpstreamQuote>),
    One(UpstreamQuote),
}

impl From<UpstreamQuote> for Quote {
    fn from(q: UpstreamQuote) -> Self {
        Self {
            text: q.text,
            author: q
                .author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Proxy for `GET /quotes`.
#[derive(Debug)]
pub struct QuotesProxy {
    http: reqwest::Client,
    upstream_url: Option<String>,
    rng: MockRng,
}

impl QuotesProxy {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            upstream_url: config.quotes_api_url.clone(),
            rng: MockRng::from_os(),
        })
    }

    pub fn with_rng(mut self, rng: MockRng) -> Self {
        self.rng = rng;
        self
    }

    pub async fn random_quote(&self) -> Result<Quote> {
        match self.upstream_url.as_deref() {
            Some(url) => self.fetch(url).await,
            None => {
                debug!("No quote service configured, using built-in quotes");
                self.builtin()
            }
        }
    }

    fn builtin(&self) -> Result<Quote> {
        let index = self.rng.lock()?.random_range(0..BUILTIN_QUOTES.len());
        let (text, author) = BUILTIN_QUOTES[index];
        Ok(Quote {
            text: text.to_string(),
            author: author.to_string(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<Quote> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Quote service request failed");
            return Err(Error::Internal(format!(
                "Quote service returned status {}",
                status
            )));
        }

        let payload: UpstreamPayload = response.json().await?;
        let quote = match payload {
            UpstreamPayload::One(q) => q,
            UpstreamPayload::Many(list) => list
                .into_iter()
                .next()
                .ok_or_else(|| Error::Internal("Quote service returned no quotes".to_string()))?,
        };

        Ok(quote.into())
    }
}

#[async_trait]
impl Proxy for QuotesProxy {
    type Query = ();
    type Output = Quote;

    const NAME: &'static str = "quotes";

    fn parse(_event: &Request) -> Result<()> {
        Ok(())
    }

    async fn handle(&self, _query: ()) -> Result<Quote> {
        self.random_quote().await
    }

    fn is_live(&self) -> bool {
        self.upstream_url.is_some()
    }
}
