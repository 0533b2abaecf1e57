//! Logger module
//!
//! Provides logging utilities for the agent including:
//! - Startup banner
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, RouteKind};

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let upstream_host: String = config.upstream.host.chars().take(35).collect();

    write_info("======================================");
    write_info("ReportPortal agent started");
    write_info(&format!("URL: http://localhost:{}", addr.port()));
    write_info(&format!("Listening on: {addr}"));
    write_info(&format!("ReportPortal: {upstream_host}"));
    write_info(&format!("Project: {}", config.upstream.project));
    write_info(&format!(
        "Proxy prefix: {} -> {}",
        config.routes.proxy_prefix,
        config.upstream.base_url()
    ));
    write_info(&format!("Static root: {}", config.routes.static_dir.display()));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if config.logging.access_log {
        write_info(&format!("Access log format: {}", config.logging.access_log_format));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Press Ctrl+C to stop");
    write_info("======================================\n");
}

pub fn log_missing_credential() {
    log_warning("RP_TOKEN environment variable is not set!");
    write_error("       Set it using: export RP_TOKEN=your-api-token");
}

pub fn log_insecure_upstream(host: &str) {
    log_warning(&insecure_upstream_warning(host));
}

fn insecure_upstream_warning(host: &str) -> String {
    format!(
        "TLS certificate verification is disabled for upstream {host}; \
         set RP_INSECURE_SKIP_VERIFY=false to verify certificates"
    )
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_proxy_error(path: &str, message: &str) {
    write_error(&format!("[PROXY ERROR] GET {path}: {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown(signal: &str) {
    write_info(&format!("\n[SIGNAL] {signal} received, shutting down"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insecure_warning_names_flag() {
        let message = insecure_upstream_warning("rp.example.com");
        assert!(message.contains("rp.example.com"));
        assert!(message.contains("set RP_INSECURE_SKIP_VERIFY=false"));
    }
}
