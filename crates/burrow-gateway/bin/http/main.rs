mod cli;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::cli::{StorageBackendArg, CLI, DEV_ENV_FILE};
use anyhow::Context;
use burrow_core::Store;
use burrow_gateway::{App, AppState};
use burrow_generator::TokenSynthesizer;
use burrow_redirector::RedirectorService;
use burrow_shortener::ShortenerService;
use burrow_storage::{InMemoryStore, RedisStore};
use clap::Parser;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = cli::env_file(std::env::args());
    let loaded = cli::load_env_file(Path::new(env_file), env_file == DEV_ENV_FILE)?;

    let config = CLI::parse();

    burrow_telemetry::init(config.log_format.into())?;

    match loaded {
        Some(path) => info!(env_file = %path.display(), dev = config.dev, "loaded env file"),
        None => debug!(env_file, "no env file, using process environment"),
    }

    let settings = config.synthesizer_settings()?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        code_length = settings.length,
        alphabet_size = settings.alphabet.len(),
        symbol_mapping = ?settings.mapping,
        max_attempts = config.max_attempts,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    let generator = TokenSynthesizer::new(settings)?;

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, Arc::new(InMemoryStore::new()), generator).await?;
        }
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            let store = RedisStore::connect(redis_url).await?;
            run_server(&config, Arc::new(store), generator).await?;
        }
    }

    Ok(())
}

async fn run_server<S: Store>(
    config: &CLI,
    store: Arc<S>,
    generator: TokenSynthesizer,
) -> anyhow::Result<()> {
    let shortener = ShortenerService::new(Arc::clone(&store), generator, config.retry_policy());
    let redirector = RedirectorService::new(store);
    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        config.base_url.clone(),
        config.request_timeout(),
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
