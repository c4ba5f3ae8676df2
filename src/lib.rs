pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod matching;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use state::SharedState;

use cli::ApiClient;
use cli::commands::{self, SearchArgs};
use matching::MatchMode;
use models::TextField;

/// Runs one CLI invocation against an already loaded config. `config_source`
/// is the file it was read from, if any.
pub async fn run(
    cli: Cli,
    config: Config,
    config_source: Option<PathBuf>,
) -> anyhow::Result<()> {
    let Cli {
        config: config_path,
        server,
        command,
    } = cli;

    // Client commands keep stderr quiet unless RUST_LOG asks for more.
    let log_level = match command {
        Commands::Serve => config.general.log_level.clone(),
        _ => "warn".to_string(),
    };
    init_tracing(&config, &log_level)?;

    match &config_source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let server_url = server.unwrap_or_else(|| config.client.server_url.clone());
    let client = || ApiClient::new(&server_url);

    match command {
        Commands::Serve => {
            config.validate()?;
            let prometheus_handle = install_metrics_recorder(&config)?;
            run_server(config, prometheus_handle).await
        }
        Commands::Init => {
            let path = config_path.as_deref();
            if Config::create_default_if_missing(path)? {
                println!(
                    "Created {}",
                    path.map_or_else(|| "config.toml".into(), |p| p.display().to_string())
                );
            } else {
                println!("Config file already exists, leaving it untouched");
            }
            Ok(())
        }
        Commands::Search {
            query,
            limit,
            tags,
            whole,
            all_terms,
            title,
        } => {
            let mode = if whole {
                MatchMode::WholeWord
            } else if all_terms {
                MatchMode::MultiTerm
            } else {
                MatchMode::Phrase
            };
            let args = SearchArgs {
                query: query.join(" "),
                limit,
                tags,
                mode,
                field: if title {
                    TextField::Title
                } else {
                    TextField::Content
                },
            };
            commands::cmd_search(&client()?, &args).await
        }
        Commands::Save { url, tags } => commands::cmd_save(&client()?, &url, &tags).await,
        Commands::Open { id, original } => commands::cmd_open(&client()?, id, original).await,
        Commands::Url { id } => commands::cmd_url(&client()?, id).await,
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
fn init_tracing(config: &Config, default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key.as_str(), value.as_str())?;
        }
        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}

fn install_metrics_recorder(
    config: &Config,
) -> anyhow::Result<Option<metrics_exporter_prometheus::PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Recall v{} starting...", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let saved_pages = config.archive.saved_pages_path.clone();

    let shared = Arc::new(SharedState::new(config).await?);
    let sites = shared.store.count_sites().await?;
    let state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(state).await;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        sites,
        saved_pages = %saved_pages,
        "Web server running at http://{addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
