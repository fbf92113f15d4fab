/// HTTP endpoint for the Hawaii climate API
///
/// Endpoints (all GET):
/// - GET /                          - Plain-text route listing
/// - GET /api/v1.0/precipitation    - Trailing-year precipitation
/// - GET /api/v1.0/stations         - Station roster
/// - GET /api/v1.0/tobs             - Trailing-year tobs of the most active station
/// - GET /api/v1.0/{start}          - TMIN/TAVG/TMAX from start
/// - GET /api/v1.0/{start}/{end}    - TMIN/TAVG/TMAX between start and end
/// - GET /health                    - Service health check
///
/// Requests are handed to a worker pool; each worker opens its own store
/// for the request and drops it when the response is sent.

use log::{error, info, warn};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use threadpool::ThreadPool;

use crate::anchor::TrailingWindow;
use crate::error::ServiceError;
use crate::service::QueryService;
use crate::store::{StoreSource, WeatherStore};

const API_PREFIX: &str = "/api/v1.0/";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/",
    "/health",
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/{start}",
    "/api/v1.0/{start}/{end}",
];

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Failed to start HTTP server on {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// A parsed request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Health,
    Precipitation,
    Stations,
    Tobs,
    StatsFrom(String),
    StatsBetween(String, String),
    NotFound,
}

/// Maps a request URL to a route. Query strings and a trailing slash are
/// ignored; date segments are percent-decoded.
pub fn parse_route(url: &str) -> Route {
    let path = url.split('?').next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match path {
        "/" => return Route::Home,
        "/health" => return Route::Health,
        _ => {}
    }

    let Some(rest) = path.strip_prefix(API_PREFIX) else {
        return Route::NotFound;
    };

    let segments: Vec<&str> = rest.split('/').collect();
    match segments.as_slice() {
        ["precipitation"] => Route::Precipitation,
        ["stations"] => Route::Stations,
        ["tobs"] => Route::Tobs,
        [start] if !start.is_empty() => Route::StatsFrom(decode_segment(start)),
        [start, end] if !start.is_empty() && !end.is_empty() => {
            Route::StatsBetween(decode_segment(start), decode_segment(end))
        }
        _ => Route::NotFound,
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

// ---------------------------------------------------------------------------
// Handling
// ---------------------------------------------------------------------------

/// Status, content type and body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: body.to_string(),
        }
    }

    fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(body) => Self { status, content_type: JSON, body },
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                Self {
                    status: 500,
                    content_type: JSON,
                    body: r#"{"error": "serialization_error"}"#.to_string(),
                }
            }
        }
    }

    fn from_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::DataAccess(_) => error!("{}", error_chain(err)),
            _ => warn!("{}", err),
        }
        Self::json(
            err.status_code(),
            &serde_json::json!({
                "error": err.kind(),
                "message": err.client_message(),
            }),
        )
    }
}

/// `err: cause: cause...` for log lines.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut line = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !line.contains(&cause_text) {
            line.push_str(": ");
            line.push_str(&cause_text);
        }
        source = cause.source();
    }
    line
}

/// Produces the reply for a route. A store is only opened for routes that
/// query data, and is dropped before this returns.
pub fn respond<Src: StoreSource>(route: &Route, source: &Src, window: TrailingWindow) -> Reply {
    match route {
        Route::Home => Reply::text(200, QueryService::<Src::Store>::list_routes()),
        Route::Health => handle_health(),
        Route::NotFound => Reply::json(
            404,
            &serde_json::json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS,
            }),
        ),
        _ => match source.open() {
            Ok(mut store) => query(route, &mut store, window),
            Err(e) => Reply::from_error(&ServiceError::DataAccess(e)),
        },
    }
}

fn query<S: WeatherStore>(route: &Route, store: &mut S, window: TrailingWindow) -> Reply {
    let mut service = QueryService::new(store, window);

    let result = match route {
        Route::Precipitation => service.precipitation().map(|v| Reply::json(200, &v)),
        Route::Stations => service.stations().map(|v| Reply::json(200, &v)),
        Route::Tobs => service.temperature_observations().map(|v| Reply::json(200, &v)),
        Route::StatsFrom(start) => service
            .temperature_stats(start, None)
            .map(|v| Reply::json(200, &v)),
        Route::StatsBetween(start, end) => service
            .temperature_stats(start, Some(end))
            .map(|v| Reply::json(200, &v)),
        Route::Home | Route::Health | Route::NotFound => {
            return Reply::json(404, &serde_json::json!({ "error": "Not found" }));
        }
    };

    result.unwrap_or_else(|e| Reply::from_error(&e))
}

/// Handle /health endpoint
fn handle_health() -> Reply {
    Reply::json(
        200,
        &serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

fn method_not_allowed(method: &tiny_http::Method) -> Reply {
    Reply::json(
        405,
        &serde_json::json!({
            "error": "method_not_allowed",
            "message": format!("{} is not supported; use GET", method),
        }),
    )
}

fn handle_request<Src: StoreSource>(request: tiny_http::Request, source: &Src, window: TrailingWindow) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let reply = if method == tiny_http::Method::Get {
        respond(&parse_route(&url), source, window)
    } else {
        method_not_allowed(&method)
    };

    info!("{} {} -> {}", method, url, reply.status);

    let mut response = tiny_http::Response::from_string(reply.body).with_status_code(reply.status);
    if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response.add_header(header);
    }

    if let Err(e) = request.respond(response) {
        warn!("Failed to send response: {}", e);
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// A bound HTTP listener.
pub struct Endpoint {
    server: tiny_http::Server,
}

impl Endpoint {
    /// Binds to `addr` (e.g. `0.0.0.0:5000`; port 0 picks a free port).
    pub fn bind(addr: &str) -> Result<Self, EndpointError> {
        let server = tiny_http::Server::http(addr).map_err(|e| EndpointError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { server })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serves requests until the listener is closed. Blocks the caller.
    pub fn serve<Src: StoreSource>(self, source: Src, window: TrailingWindow, workers: usize) {
        let source = Arc::new(source);
        let pool = ThreadPool::new(workers.max(1));

        match self.local_addr() {
            Some(addr) => info!("HTTP endpoint listening on http://{}", addr),
            None => info!("HTTP endpoint listening"),
        }

        for request in self.server.incoming_requests() {
            let source = Arc::clone(&source);
            pool.execute(move || handle_request(request, source.as_ref(), window));
        }

        pool.join();
    }
}

/// Binds and serves in one call.
pub fn start_endpoint_server<Src: StoreSource>(
    addr: &str,
    source: Src,
    window: TrailingWindow,
    workers: usize,
) -> Result<(), EndpointError> {
    Endpoint::bind(addr)?.serve(source, window, workers);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
