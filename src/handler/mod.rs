//! Request handler module
//!
//! Classifies requests and dispatches them to the preflight responder, the upstream
//! proxy or the static file server.

pub mod proxy;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
