//! Upstream proxy forwarding module
//!
//! Performs the single upstream call for a proxied request and mirrors its status
//! and body back to the caller.

use crate::http;
use crate::logger;
use crate::upstream::Upstream;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Forward `path_and_query` to the upstream and build the caller's response
///
/// Transport failures become a 500 with a JSON error envelope; nothing is retried.
pub async fn forward(upstream: &dyn Upstream, path_and_query: &str) -> Response<Full<Bytes>> {
    match upstream.fetch(path_and_query).await {
        Ok(reply) => http::build_proxied_response(reply.status, reply.body),
        Err(e) => {
            let message = e.to_string();
            logger::log_proxy_error(path_and_query, &message);
            http::build_proxy_error_response(&message)
        }
    }
}
