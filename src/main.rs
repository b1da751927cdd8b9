use std::sync::Arc;

mod config;
mod document;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use config::{AppState, Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use error::StartupError;
use handler::static_files::StaticAssetCache;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The only argument consumed: a document source overriding the config
    let source_override = std::env::args().nth(1);
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let cfg = Config::load_from(&config_path, source_override).map_err(StartupError::from)?;
    logger::init(&cfg)?;

    // Single-threaded, cooperative scheduling: every connection runs on one LocalSet
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg)).map_err(|e| {
        logger::log_error(&format!("Startup failed: {e}"));
        e.into()
    })
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    cfg.validate()?;
    let addr = cfg.get_socket_addr()?;

    let documents = document::load_registry(&cfg.document).await?;
    let assets = StaticAssetCache::open(&cfg.assets.dir)?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, assets.root(), &cfg);
    let state = Arc::new(AppState::new(cfg, documents, assets));

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            server::shutdown_signal(),
        ))
        .await;

    Ok(())
}
