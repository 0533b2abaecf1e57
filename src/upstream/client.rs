//! HTTPS upstream client
//!
//! Wraps one `reqwest::Client` configured for the upstream target: bearer credential,
//! JSON content type, no redirects, no idle pooling, and certificate validation
//! controlled by `insecure_skip_verify`.

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{redirect, Client, Request};

use super::{FetchFuture, Upstream, UpstreamError, UpstreamReply};
use crate::config::UpstreamConfig;

pub struct UpstreamClient {
    client: Client,
    base_url: String,
    authorization: HeaderValue,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder()
            // Self-signed upstreams are accepted only when insecure_skip_verify is set
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .no_proxy();

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| UpstreamError::Client(describe_error(&e)))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.credential))
            .map_err(|_| {
                UpstreamError::Client("credential contains invalid header characters".to_string())
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            base_url: config.base_url(),
            authorization,
        })
    }

    /// Build the outbound GET for `path_and_query` without sending it
    pub fn build_request(&self, path_and_query: &str) -> Result<Request, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, path_and_query))
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, "application/json")
            .build()
    }

    async fn send(&self, path_and_query: &str) -> Result<UpstreamReply, reqwest::Error> {
        let request = self.build_request(path_and_query)?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(UpstreamReply { status, body })
    }
}

impl Upstream for UpstreamClient {
    fn fetch<'a>(&'a self, path_and_query: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            self.send(path_and_query)
                .await
                .map_err(|e| UpstreamError::Transport(describe_error(&e)))
        })
    }
}

/// Flatten an error and its source chain into one line
fn describe_error(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_config(host: &str, port: u16, credential: &str) -> UpstreamConfig {
        UpstreamConfig {
            host: host.to_string(),
            port,
            credential: credential.to_string(),
            project: "test".to_string(),
            insecure_skip_verify: true,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn test_request_targets_exact_path_and_query() {
        let client = UpstreamClient::new(&upstream_config("rp.example.com", 443, "tok")).unwrap();
        let req = client.build_request("/api/foo?bar=1").unwrap();

        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().scheme(), "https");
        assert_eq!(req.url().host_str(), Some("rp.example.com"));
        assert_eq!(req.url().port_or_known_default(), Some(443));
        assert_eq!(req.url().path(), "/api/foo");
        assert_eq!(req.url().query(), Some("bar=1"));
    }

    #[test]
    fn test_request_carries_bearer_and_json_headers() {
        let client = UpstreamClient::new(&upstream_config("rp.example.com", 443, "tok")).unwrap();
        let req = client.build_request("/api/v1/launch").unwrap();

        let auth = req.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer tok");
        assert!(auth.is_sensitive());
        assert_eq!(
            req.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_custom_port_in_url() {
        let client = UpstreamClient::new(&upstream_config("10.0.0.5", 8443, "tok")).unwrap();
        let req = client.build_request("/api/x").unwrap();
        assert_eq!(req.url().port(), Some(8443));
    }

    #[test]
    fn test_invalid_credential_rejected() {
        let result = UpstreamClient::new(&upstream_config("rp.example.com", 443, "bad\ntoken"));
        assert!(matches!(result, Err(UpstreamError::Client(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Reserve a port, then free it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = UpstreamClient::new(&upstream_config("127.0.0.1", port, "s3cret-credential")).unwrap();
        match client.fetch("/api/ping").await {
            Err(UpstreamError::Transport(message)) => {
                assert!(!message.is_empty());
                assert!(!message.contains("s3cret-credential"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
