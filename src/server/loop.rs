// Server loop module
// Accepts connections until a shutdown signal arrives

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::spawn_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` until `shutdown` completes
///
/// Accept errors are logged and the loop keeps going. Connections already being
/// served are left to finish on their own tasks.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        spawn_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use crate::upstream::UpstreamClient;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_serves_preflight_static_and_proxy_errors() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("index.html"), "<h1>launches</h1>").unwrap();

        // Upstream port with nothing listening
        let dead_port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };

        let vars: HashMap<String, String> = [
            ("RP_HOST", "127.0.0.1".to_string()),
            ("RP_PORT", dead_port.to_string()),
            ("RP_TOKEN", "s3cret-credential".to_string()),
            ("STATIC_DIR", root.path().to_string_lossy().into_owned()),
            ("ACCESS_LOG", "false".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let cfg = Config::from_vars(vars).unwrap();

        let upstream = UpstreamClient::new(&cfg.upstream).unwrap();
        let state = Arc::new(AppState::new(cfg, Arc::new(upstream)));
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, state, async move {
            let _ = stop_rx.await;
        }));

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let base = format!("http://{addr}");

        let resp = client
            .request(reqwest::Method::OPTIONS, format!("{base}/api/v1/launch"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");

        let resp = client.get(format!("{base}/")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html");
        assert_eq!(resp.text().await.unwrap(), "<h1>launches</h1>");

        let resp = client.get(format!("{base}/missing.png")).send().await.unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().await.unwrap(), "Not Found");

        let resp = client.get(format!("{base}/api/v1/launch?page=1")).send().await.unwrap();
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let body: serde_json::Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(!message.contains("s3cret-credential"));

        stop_tx.send(()).unwrap();
        server.await.unwrap();
    }
}
