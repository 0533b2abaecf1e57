// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
    pub routes: RoutesConfig,
}

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// The single upstream service every proxied request is forwarded to
#[derive(Clone)]
pub struct UpstreamConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token injected into every upstream request. Empty when unset.
    pub credential: String,
    pub project: String,
    /// Accept any certificate presented by the upstream (self-signed deployments).
    pub insecure_skip_verify: bool,
    /// Optional overall timeout for one upstream call, in seconds.
    pub timeout_secs: Option<u64>,
}

impl UpstreamConfig {
    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Base URL without trailing slash, e.g. `https://host:443`
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

// The credential must never reach a log line through `{:?}`.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "credential",
                &if self.has_credential() { "<redacted>" } else { "<empty>" },
            )
            .field("project", &self.project)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

/// Request classification settings
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// Requests whose path starts with this prefix are forwarded upstream
    pub proxy_prefix: String,
    pub static_dir: PathBuf,
    /// Document served for `/`
    pub default_document: String,
}

/// Flat view of the environment map, as deserialized by the `config` crate.
///
/// Keys are the lowercased variable names (`RP_HOST` -> `rp_host`).
#[derive(Debug, Deserialize)]
pub(super) struct EnvSettings {
    pub listen_host: String,
    pub port: u16,
    pub workers: Option<usize>,

    pub rp_host: String,
    pub rp_port: u16,
    pub rp_token: Option<String>,
    pub rp_api_token: Option<String>,
    pub rp_project: String,
    pub rp_insecure_skip_verify: bool,
    pub rp_timeout_secs: Option<u64>,

    pub proxy_prefix: String,
    pub static_dir: String,
    pub default_document: String,

    pub access_log: bool,
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

impl From<EnvSettings> for Config {
    fn from(env: EnvSettings) -> Self {
        // First non-empty alias wins
        let credential = [env.rp_token, env.rp_api_token]
            .into_iter()
            .flatten()
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        let proxy_prefix = if env.proxy_prefix.starts_with('/') {
            env.proxy_prefix
        } else {
            format!("/{}", env.proxy_prefix)
        };

        Self {
            server: ServerConfig {
                host: env.listen_host,
                port: env.port,
                workers: env.workers,
            },
            upstream: UpstreamConfig {
                host: env.rp_host,
                port: env.rp_port,
                credential,
                project: env.rp_project,
                insecure_skip_verify: env.rp_insecure_skip_verify,
                timeout_secs: env.rp_timeout_secs,
            },
            logging: LoggingConfig {
                access_log: env.access_log,
                access_log_format: env.access_log_format,
                access_log_file: env.access_log_file,
                error_log_file: env.error_log_file,
            },
            routes: RoutesConfig {
                proxy_prefix,
                static_dir: PathBuf::from(env.static_dir),
                default_document: env.default_document.trim_start_matches('/').to_string(),
            },
        }
    }
}
