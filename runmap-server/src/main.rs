use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use runmap_server::{AppState, ServerConfig, router};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "runmap-server", version, about = "Nearby running courses and cafés over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `server.bind`
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Place catalogue file; repeat for several. Replaces `catalogue.path`.
    #[arg(long = "places")]
    places: Vec<PathBuf>,

    /// OSRM-compatible directions service, overrides `directions.base_url`
    #[arg(long)]
    directions_url: Option<String>,

    /// Log filter directive such as `debug` or `runmap_core=trace`.
    /// Takes precedence over `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if !self.places.is_empty() {
            config.catalogue.path = self.places.clone();
        }
        if let Some(url) = &self.directions_url {
            config.directions.base_url = Some(url.clone());
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let state = AppState::from_config(&config)?;
    let app = router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    tracing::info!(addr = %config.server.bind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
