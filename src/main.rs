use clap::Parser;
use docsearch::config::WebtoolConfig;
use docsearch::config::settings::DEFAULT_CONFIG_FILE;
use docsearch::search::{AppState, SearchResources, build_router};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "webtool", about = "Document search web tool backed by Solr")]
struct Args {
    /// TOML settings file, skipped when missing
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides the configured listen address
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = WebtoolConfig::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    tracing::info!("Solr index 0: {}", config.solr_index_0);
    tracing::info!("Solr index 1: {}", config.solr_index_1);
    tracing::info!("Solr index 2: {}", config.solr_index_2);

    // 1. Static resources (stopwords, keyword matcher, vectors):
    let resources = SearchResources::load(&config)?;

    // 2. HTTP router:
    let bind_addr = config.bind;
    let app = build_router(AppState::new(config, resources));

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
