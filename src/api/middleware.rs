//! Cross-cutting request middleware.
//!
//! Applied to every route, outermost first:
//! request-id assignment, request-id echo, request tracing, CORS,
//! request metrics, panic recovery, client-IP resolution.

use std::any::Any;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK},
        HeaderMap, HeaderName, HeaderValue, Method,
    },
    middleware::{self as axum_middleware, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{debug, error, info_span, Level, Span};

use crate::error::ApiError;
use crate::metrics;

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Preflight cache lifetime advertised to browsers.
pub const CORS_MAX_AGE: Duration = Duration::from_secs(300);

// Checked in order; the first parseable address wins.
const TRUE_CLIENT_IP: &str = "true-client-ip";
const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address resolved from proxy headers or the socket peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Apply the full middleware stack to a router.
pub fn with_middleware(router: Router, origin: HeaderValue) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(cors_layer(origin))
        .layer(axum_middleware::from_fn(track_metrics))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum_middleware::from_fn(resolve_client_ip));

    router.layer(stack)
}

/// CORS policy: the configured frontend origin only, with credentials.
///
/// Other origins get no `access-control-allow-origin` header at all.
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ACCEPT,
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([LINK])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

fn make_request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };

    error!(panic = %detail, "Handler panicked, returning 500");
    ApiError::Internal.into_response()
}

/// Pick the client address from proxy headers, falling back to the peer.
pub fn client_ip_from_headers(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header_str(TRUE_CLIENT_IP)
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| header_str(X_REAL_IP).and_then(|v| v.trim().parse().ok()))
        .or_else(|| {
            header_str(X_FORWARDED_FOR)
                .and_then(|v| v.split(',').next())
                .and_then(|v| v.trim().parse().ok())
        })
        .or(peer)
}

async fn resolve_client_ip(mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(ip) = client_ip_from_headers(request.headers(), peer) {
        debug!(client_ip = %ip, "Resolved client address");
        request.extensions_mut().insert(ClientIp(ip));
    }

    next.run(request).await
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_http_request(start, &method, &endpoint, response.status().as_u16());
    response
}
