use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use playstore_proxy::config::loader::{load_config, ConfigError};
use playstore_proxy::config::validation::validate_config;
use playstore_proxy::config::ProxyConfig;
use playstore_proxy::http::{HttpServer, ServerError};
use playstore_proxy::lifecycle::{signals, Shutdown};
use playstore_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "playstore-proxy")]
#[command(about = "Reverse proxy for a Play Store listing page", long_about = None)]
struct Cli {
    /// Listening address for the http server [default: 0.0.0.0:8085]
    #[arg(long)]
    listen: Option<String>,

    /// Run application in debug env [default: true]
    #[arg(long, action = clap::ArgAction::Set, value_name = "BOOL")]
    debug: Option<bool>,

    /// Optional TOML config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration errors surface before logging is up.
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    logging::init(config.observability.effective_level());
    tracing::info!(
        listen = %config.server.listen,
        debug = config.observability.debug,
        upstream = %config.upstream.url,
        "playstore-proxy starting"
    );

    if let Err(e) = serve(config).await {
        tracing::error!(error = %e, "fatal server error");
        std::process::exit(1);
    }
}

/// Assemble configuration: defaults, then the optional file, then flags.
fn build_config(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(listen) = &cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(debug) = cli.debug {
        config.observability.debug = debug;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Bind, install signal handling and run until shutdown completes.
async fn serve(config: ProxyConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(&config.server.listen)
        .await
        .map_err(ServerError::Bind)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await
}
