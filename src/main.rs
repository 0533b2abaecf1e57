use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod upstream;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: env file path (default `.env`)
    let env_file = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(config::DEFAULT_ENV_FILE), PathBuf::from);
    let cfg = config::Config::load_from(&env_file)?;

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    if !cfg.upstream.has_credential() {
        logger::log_missing_credential();
    }
    if cfg.upstream.insecure_skip_verify {
        logger::log_insecure_upstream(&cfg.upstream.host);
    }

    let addr = cfg.get_socket_addr()?;
    let upstream = upstream::UpstreamClient::new(&cfg.upstream)?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&listener.local_addr()?, &cfg);

    let state = Arc::new(config::AppState::new(cfg, Arc::new(upstream)));
    server::run(listener, state, server::wait_for_shutdown()).await;

    Ok(())
}
