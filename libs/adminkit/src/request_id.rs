//! Request correlation and the shared middleware stack of the admin server.
//!
//! Every request gets an `x-request-id` (kept when the client sends one),
//! runs inside an `http_request` span carrying it, and sees it as an
//! [`XRequestId`] extension. The id is echoed on the response.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, Request};
use axum::{body::Body, middleware::from_fn, middleware::Next, response::Response, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

const UNKNOWN: &str = "n/a";

/// Request id as seen by handlers.
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

/// The request id carried in `headers`, if any.
pub fn from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(header()).and_then(|v| v.to_str().ok())
}

#[derive(Clone, Default)]
struct NanoId;

impl MakeRequestId for NanoId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        nanoid::nanoid!().parse().ok().map(RequestId::new)
    }
}

async fn expose_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = from_headers(req.headers()).unwrap_or(UNKNOWN).to_owned();
    tracing::Span::current().record("request_id", tracing::field::display(&id));
    req.extensions_mut().insert(XRequestId(id));
    next.run(req).await
}

fn http_span(req: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri().path(),
        request_id = %from_headers(req.headers()).unwrap_or(UNKNOWN),
        status = Empty,
        latency_ms = Empty
    )
}

/// Settings for the shared middleware stack.
#[derive(Debug, Clone)]
pub struct HttpLayers {
    pub timeout: Duration,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl Default for HttpLayers {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cors_enabled: false,
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

impl HttpLayers {
    /// Wrap `router` with the full stack. The outermost layer is the body
    /// limit; the innermost echoes `x-request-id` on the response.
    pub fn apply(&self, router: Router) -> Router {
        let mut router = router
            .layer(PropagateRequestIdLayer::new(header()))
            .layer(from_fn(expose_request_id))
            .layer(TraceLayer::new_for_http().make_span_with(http_span))
            .layer(SetRequestIdLayer::new(header(), NanoId))
            .layer(TimeoutLayer::new(self.timeout));

        if self.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router.layer(RequestBodyLimitLayer::new(self.body_limit_bytes))
    }
}
