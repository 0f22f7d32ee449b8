//! REST API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                     REST LAYER                        │
//!                    │                                                       │
//!   Client Request   │  ┌──────────┐    ┌───────────┐    ┌───────────────┐  │
//!   ─────────────────┼─▶│   http   │───▶│  routing  │───▶│   resource    │  │
//!                    │  │ server   │    │ is_rest?  │    │   handler     │  │
//!                    │  └──────────┘    └───────────┘    └───────┬───────┘  │
//!                    │                                           │          │
//!                    │                                           ▼          │
//!                    │                 ┌─────────────────────────────────┐  │
//!   Client Response  │                 │ visitor: Accept → dispatch table │  │
//!   ◀────────────────┼─────────────────│ → output visitor (json / xml)    │  │
//!                    │                 └─────────────────────────────────┘  │
//!                    │                                                       │
//!                    │  ┌─────────┐ ┌──────────────┐ ┌───────────────────┐  │
//!                    │  │ config  │ │observability │ │ lifecycle         │  │
//!                    │  │ + watch │ │ logs/metrics │ │ reload / shutdown │  │
//!                    │  └─────────┘ └──────────────┘ └───────────────────┘  │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use rest_bundle::config::watcher::ConfigWatcher;
use rest_bundle::http::HttpServer;
use rest_bundle::lifecycle::{signals, startup, Shutdown};
use rest_bundle::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "rest-bundle")]
#[command(about = "REST API server with Accept-header content negotiation", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload visitors when the configuration file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::load_or_default(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "rest-bundle starting"
    );

    // The table must build before any traffic is accepted.
    let dispatcher = Arc::new(startup::build_dispatcher(&config)?);

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let (config_updates, _watcher) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(
        shutdown.clone(),
        dispatcher.clone(),
        args.config.clone(),
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, dispatcher, args.config);
    server.run(listener, config_updates, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
