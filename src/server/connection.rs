// Connection handling module
// Serves one accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a connection in a spawned task.
///
/// Requests on one connection never wait on another connection's upstream call.
/// If the client goes away mid-request, hyper drops the in-flight handler future,
/// which also cancels its pending upstream call.
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `peer_addr` - The client's address, recorded in the access log
/// * `state` - Shared read-only application state
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&state), peer_addr)
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}
