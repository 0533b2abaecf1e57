//! Upstream service module
//!
//! The seam between request handling and the single upstream API. Handlers only see
//! the [`Upstream`] trait; [`UpstreamClient`] is the HTTPS implementation used in
//! production.

mod client;

pub use client::UpstreamClient;

use hyper::body::Bytes;
use hyper::StatusCode;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Buffered upstream response
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connect, DNS, TLS, timeout or body read failure. The message is returned
    /// to the caller verbatim.
    #[error("{0}")]
    Transport(String),

    /// HTTP client could not be constructed at startup
    #[error("failed to build upstream client: {0}")]
    Client(String),
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<UpstreamReply, UpstreamError>> + Send + 'a>>;

/// A fixed upstream that answers GET requests for a relative path+query
pub trait Upstream: Send + Sync {
    /// Issue exactly one GET for `path_and_query` (e.g. `/api/v1/x?page=2`)
    fn fetch<'a>(&'a self, path_and_query: &'a str) -> FetchFuture<'a>;
}
