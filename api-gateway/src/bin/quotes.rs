//! Quotes Lambda - Handles GET /quotes.

use lambda_http::{run, service_fn, Error, Request};
use shared::{Config, Proxy, QuotesProxy};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();
    let proxy = Arc::new(QuotesProxy::new(&config)?);
    info!(live = proxy.is_live(), "Quotes proxy ready");

    run(service_fn(move |event: Request| {
        let proxy = Arc::clone(&proxy);
        async move { shared::http::serve(proxy.as_ref(), event).await }
    }))
    .await
}
