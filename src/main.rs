//! query-dispatch: run a search query against a configured endpoint
//!
//! This is the main entry point for the demo binary.

use anyhow::Result;
use clap::Parser;
use query_dispatch::{
    client::query::{PingQuery, PingResult, SelectQuery, SelectResult},
    events::{EventDispatcher, LoggingObserver},
    metrics::Metrics,
    AsyncQueryDispatcher, Query, SearchClient, Settings,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Run a search query asynchronously against a configured endpoint
#[derive(Parser, Debug)]
#[command(name = "query-dispatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "QUERY_DISPATCH_SETTINGS_PATH")]
    config: Option<PathBuf>,

    /// Endpoint key (defaults to the configured default)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Ping the endpoint instead of searching
    #[arg(long)]
    ping: bool,

    /// Search query
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    info!("Starting query-dispatch v{}", query_dispatch::VERSION);

    // Load configuration
    let settings = load_settings(args.config.as_deref())?;
    let client = SearchClient::from_settings(&settings)?;
    info!("Configured {} endpoints", client.endpoint_keys().len());

    let metrics = Arc::new(Metrics::new());
    let observers = EventDispatcher::new()
        .with_observer(Arc::new(LoggingObserver::new()))
        .with_observer(metrics.clone());
    let dispatcher = AsyncQueryDispatcher::new(client).with_observer(Arc::new(observers));

    let query: Box<dyn Query> = if args.ping {
        Box::new(PingQuery::new())
    } else {
        Box::new(SelectQuery::new().query(args.query.unwrap_or_else(|| "*:*".to_string())))
    };

    let pending = match args.endpoint.as_deref() {
        Some(key) => dispatcher.dispatch_to(query.as_ref(), key)?,
        None => dispatcher.dispatch(query.as_ref())?,
    };
    let response = pending.await?;

    if args.ping {
        let result: PingResult = response.json()?;
        println!("ping: {} ({} ms)", result.status, result.header.query_time);
    } else {
        let result: SelectResult = response.json()?;
        println!("found {} documents", result.num_found());
        for doc in result.docs() {
            println!("{}", serde_json::Value::Object(doc.clone()));
        }
    }

    info!("Completed {} requests", metrics.get_total_requests());
    Ok(())
}

/// Load settings from file or use defaults
fn load_settings(explicit: Option<&std::path::Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        info!("Loading settings from: {}", path.display());
        let mut settings = Settings::from_file(path)?;
        settings.merge_env();
        return Ok(settings);
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("query-dispatch/settings.yml"));
    }

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Use defaults: a single local endpoint
    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.endpoints.push(query_dispatch::Endpoint::default());
    settings.merge_env();
    Ok(settings)
}
