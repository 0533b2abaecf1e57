// Configuration module entry point
// Builds the immutable startup configuration and the shared request state

mod env_file;
mod state;
mod types;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

pub use state::AppState;
pub use types::{Config, RoutesConfig, UpstreamConfig};

/// Default env file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

impl Config {
    /// Load configuration from the process environment, overlaid by the
    /// key=value file at `env_file` when it exists
    pub fn load_from(env_file: &Path) -> Result<Self, config::ConfigError> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();
        vars.extend(env_file::read(env_file));
        Self::from_vars(vars)
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .ignore_empty(true)
                    .source(Some(vars.into_iter().collect())),
            )
            .set_default("listen_host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("rp_host", "reportportal.qa.staging.integrator.io")?
            .set_default("rp_port", 443)?
            .set_default("rp_project", "staging_suites")?
            .set_default("rp_insecure_skip_verify", true)?
            .set_default("proxy_prefix", "/api/")?
            .set_default("static_dir", ".")?
            .set_default("default_document", "index.html")?
            .set_default("access_log", true)?
            .set_default("access_log_format", "combined")?
            .build()?;

        settings
            .try_deserialize::<types::EnvSettings>()
            .map(Self::from)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
