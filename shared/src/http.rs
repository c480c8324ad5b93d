//! HTTP helpers for Lambda functions.

use lambda_http::http::{response::Builder, Method};
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::proxy::Proxy;
use crate::Error;

/// Cross-origin headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization, X-Client-Info, Apikey",
    ),
];

fn with_cors(mut builder: Builder) -> Builder {
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    builder
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    let body = serde_json::to_string(data)?;
    let response = with_cors(Response::builder())
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))?;
    Ok(response)
}

/// Create the error response for a failed request.
pub fn error_response(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    json_response(err.status_code(), &err.body())
}

/// Answer a cross-origin preflight probe.
pub fn preflight() -> Result<Response<Body>, lambda_http::Error> {
    let response = with_cors(Response::builder())
        .status(200)
        .body(Body::Empty)?;
    Ok(response)
}

/// Run a proxy against one API Gateway request.
///
/// Preflight probes short-circuit before any parameter handling. Every other
/// method is served as a read.
pub async fn serve<P: Proxy>(
    proxy: &P,
    event: Request,
) -> Result<Response<Body>, lambda_http::Error> {
    let method = event.method().clone();
    info!(
        proxy = P::NAME,
        method = %method,
        path = event.uri().path(),
        "Received request"
    );

    if method == Method::OPTIONS {
        return preflight();
    }

    debug!(
        proxy = P::NAME,
        mode = if proxy.is_live() { "live" } else { "mock" },
        "Serving request"
    );

    let result = match P::parse(&event) {
        Ok(query) => proxy.handle(query).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => json_response(200, &output),
        Err(err) => {
            if err.is_internal() {
                error!(proxy = P::NAME, error = %err, "Request failed");
            } else {
                warn!(proxy = P::NAME, status = err.status_code(), error = %err, "Request rejected");
            }
            error_response(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, CurrencyProxy, QuotesProxy, WeatherProxy};
    use lambda_http::RequestExt;
    use std::collections::HashMap;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(verb: &str, uri: &str, query: &[(&str, &str)]) -> Request {
        let params: HashMap<String, String> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        lambda_http::http::Request::builder()
            .method(verb)
            .uri(uri)
            .body(Body::Empty)
            .unwrap()
            .with_query_string_parameters(params)
    }

    fn body_json(response: &Response<Body>) -> serde_json::Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    fn assert_cors(response: &Response<Body>) {
        for (name, value) in CORS_HEADERS {
            assert_eq!(
                response.headers().get(name).and_then(|v| v.to_str().ok()),
                Some(value),
                "missing {}",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_preflight_on_every_endpoint() {
        let config = Config::default();
        let weather = WeatherProxy::new(&config).unwrap();
        let currency = CurrencyProxy::new(&config).unwrap();
        let quotes = QuotesProxy::new(&config).unwrap();

        // Parameters that would fail validation are ignored for a probe.
        let responses = vec![
            serve(&weather, request("OPTIONS", "/weather", &[])).await.unwrap(),
            serve(&currency, request("OPTIONS", "/currency", &[("amount", "-5")]))
                .await
                .unwrap(),
            serve(&quotes, request("OPTIONS", "/quotes", &[])).await.unwrap(),
        ];

        for response in responses {
            assert_eq!(response.status(), 200);
            assert_cors(&response);
            assert!(matches!(response.body(), Body::Empty));
        }
    }

    #[tokio::test]
    async fn test_success_carries_cors_and_json() {
        let proxy = CurrencyProxy::new(&Config::default()).unwrap();
        let response = serve(
            &proxy,
            request(
                "GET",
                "/currency",
                &[("amount", "1000"), ("from", "INR"), ("to", "USD")],
            ),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_cors(&response);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );

        let json = body_json(&response);
        assert_eq!(json["from"], "INR");
        assert_eq!(json["to"], "USD");
        assert_eq!(json["amount"].as_f64(), Some(1000.0));
        assert_eq!(json["converted"].as_f64(), Some(12.0));
        assert_eq!(json["rate"], "0.0120");
    }

    #[tokio::test]
    async fn test_validation_failure_carries_cors() {
        let proxy = WeatherProxy::new(&Config::default()).unwrap();
        let response = serve(&proxy, request("GET", "/weather", &[("city", "")]))
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert_cors(&response);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"error": "City parameter is required"})
        );
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let proxy = CurrencyProxy::new(&Config::default()).unwrap();
        let response = serve(
            &proxy,
            request(
                "GET",
                "/currency",
                &[("amount", "-5"), ("from", "USD"), ("to", "EUR")],
            ),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"error": "Valid amount is required"})
        );
    }

    #[tokio::test]
    async fn test_post_is_served_like_get() {
        let proxy = QuotesProxy::new(&Config::default()).unwrap();
        let response = serve(&proxy, request("POST", "/quotes", &[])).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_cors(&response);
        let json = body_json(&response);
        assert!(json["text"].is_string());
        assert!(json["author"].is_string());
    }

    #[tokio::test]
    async fn test_internal_error_has_details() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let config = Config::default().with_quotes_api_url(format!("{}/random", mock_server.uri()));
        let proxy = QuotesProxy::new(&config).unwrap();
        let response = serve(&proxy, request("GET", "/quotes", &[])).await.unwrap();

        assert_eq!(response.status(), 500);
        assert_cors(&response);
        let json = body_json(&response);
        assert_eq!(json["error"], "Internal server error");
        assert!(json["details"].is_string());
    }
}
