//! Request classification module
//!
//! Entry point for HTTP request processing. Every request is classified into exactly
//! one of preflight, proxy or static and answered with exactly one response.

use crate::config::{AppState, RoutesConfig};
use crate::handler::{proxy, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry, RouteKind};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Uri, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Routing decision for one inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight, answered without further processing
    Preflight,
    /// Forward to the upstream with this exact path and query
    Proxy { path_and_query: String },
    /// Serve this path from the static root
    Static { path: String },
    /// Proxy path with `.` or `..` segments, answered 404 without an upstream call
    Rejected { path: String },
}

impl Route {
    pub const fn kind(&self) -> RouteKind {
        match self {
            Self::Preflight => RouteKind::Preflight,
            Self::Proxy { .. } => RouteKind::Proxy,
            Self::Static { .. } => RouteKind::Static,
            Self::Rejected { .. } => RouteKind::Rejected,
        }
    }
}

/// Classify a request by method and path
///
/// OPTIONS always wins. Other methods are not checked: anything under the proxy
/// prefix is forwarded as GET, everything else is a static lookup. Proxy paths with
/// dot segments are rejected: the forwarded path must keep the prefix.
pub fn classify(method: &Method, uri: &Uri, routes: &RoutesConfig) -> Route {
    if *method == Method::OPTIONS {
        return Route::Preflight;
    }

    let path = uri.path();
    if path.starts_with(&routes.proxy_prefix) {
        if has_dot_segment(path) {
            return Route::Rejected {
                path: path.to_string(),
            };
        }
        let path_and_query = match uri.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        };
        return Route::Proxy { path_and_query };
    }

    Route::Static {
        path: static_files::asset_path(path, &routes.default_document),
    }
}

/// True when any `/` or `\` separated segment is `.` or `..`, plain or percent-encoded
fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; proxied calls are always body-less GETs.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let route = classify(req.method(), req.uri(), &state.config.routes);

    let response = dispatch(&route, &state).await;

    if state.config.logging.access_log {
        let entry = access_entry(&req, &route, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Produce the response for a routing decision
pub async fn dispatch(route: &Route, state: &AppState) -> Response<Full<Bytes>> {
    match route {
        Route::Preflight => http::build_preflight_response(),
        Route::Proxy { path_and_query } => {
            proxy::forward(state.upstream.as_ref(), path_and_query).await
        }
        Route::Static { path } => static_files::serve(&state.config.routes.static_dir, path).await,
        Route::Rejected { path } => {
            logger::log_warning(&format!("Dot segment in proxy path rejected: {path}"));
            http::build_404_response()
        }
    }
}

fn access_entry<B>(
    req: &Request<B>,
    route: &Route,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.route = route.kind();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
