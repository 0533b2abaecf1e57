//! Static file serving module
//!
//! Resolves request paths against the static root, loads whole files and maps
//! failures to 404/500 responses.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// A loaded static file
#[derive(Debug)]
pub struct StaticAsset {
    pub data: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Error)]
pub enum StaticError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for StaticError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(err)
        }
    }
}

/// Serve a static asset for `path`, already mapped from `/` to the default document
pub async fn serve(static_dir: &Path, path: &str) -> Response<Full<Bytes>> {
    match resolve(static_dir, path).await {
        Ok(asset) => http::build_asset_response(asset.data, asset.content_type),
        Err(StaticError::NotFound) => http::build_404_response(),
        Err(StaticError::Io(e)) => {
            logger::log_error(&format!("Failed to read static file '{path}': {e}"));
            http::build_500_response()
        }
    }
}

/// Load the file for a request path from the static root
///
/// Paths that escape the root (`..` segments, symlinks pointing outside) are
/// reported as `NotFound`.
pub async fn resolve(static_dir: &Path, path: &str) -> Result<StaticAsset, StaticError> {
    let relative = path.trim_start_matches('/');
    let root = fs::canonicalize(static_dir).await?;
    let file_path = fs::canonicalize(root.join(relative)).await?;

    if !file_path.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path.display()
        ));
        return Err(StaticError::NotFound);
    }

    let data = fs::read(&file_path).await?;

    Ok(StaticAsset {
        data: Bytes::from(data),
        content_type: mime::content_type_for(&file_path),
    })
}

/// Map an inbound path to the asset path, substituting the default document for `/`
pub fn asset_path(path: &str, default_document: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{default_document}")
    } else {
        path.to_string()
    }
}
