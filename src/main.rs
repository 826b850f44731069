//! proxy-router command line.
//!
//! Operator tool around the routing library:
//! - `validate`: build a route configuration and report errors
//! - `route`: resolve the route for one request described on the command line
//! - `watch`: keep a configuration loaded and reapply it when the file changes

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use proxy_router::config::watcher::ConfigWatcher;
use proxy_router::config::{load_config, load_route_matcher};
use proxy_router::observability::logging;
use proxy_router::{Extensions, Request, RouteConfigProvider, RouteEntry};

#[derive(Parser)]
#[command(name = "proxy-router")]
#[command(about = "Validate and exercise route configurations", long_about = None)]
struct Cli {
    /// Default log level (RUST_LOG overrides it)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a route configuration builds
    Validate { config: PathBuf },
    /// Resolve the route for a single request
    Route {
        config: PathBuf,

        #[arg(long)]
        host: String,

        #[arg(long, default_value = "")]
        method: String,

        #[arg(long, default_value = "")]
        path: String,

        /// Request property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Load a route configuration and reapply it whenever the file changes
    Watch { config: PathBuf },
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("invalid property '{}', expected key=value", raw))
}

fn render_route(entry: Option<&RouteEntry>) -> Result<String, serde_json::Error> {
    match entry {
        Some(entry) => serde_json::to_string_pretty(&json!({
            "route": entry.name(),
            "cluster": entry.cluster_name(),
            "metadata": entry.metadata(),
        })),
        None => Ok("no route".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let extensions = Extensions::with_builtin_inputs();

    match cli.command {
        Commands::Validate { config } => {
            let matcher = load_route_matcher(&config, &extensions)?;
            println!("Route configuration '{}' is valid", matcher.name());
        }
        Commands::Route {
            config,
            host,
            method,
            path,
            properties,
        } => {
            let matcher = load_route_matcher(&config, &extensions)?;
            let mut request = Request::new(host).with_method(method).with_path(path);
            request.properties.extend(properties);

            let entry = matcher.route_entry(&request);
            println!("{}", render_route(entry.as_deref())?);
        }
        Commands::Watch { config } => watch(&config, extensions).await?,
    }

    Ok(())
}

async fn watch(path: &Path, extensions: Extensions) -> Result<(), Box<dyn std::error::Error>> {
    let initial = load_config(path)?;
    let provider = RouteConfigProvider::new(&initial, Arc::new(extensions))?;

    let (watcher, mut updates) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            Some(config) = updates.recv() => {
                if provider.update(&config).is_err() {
                    tracing::warn!(
                        version = provider.version(),
                        "Serving previous route configuration"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
