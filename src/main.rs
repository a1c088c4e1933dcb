use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;

use hello_cluster::config::ConfigWatcher;
use hello_cluster::lifecycle::{signals, startup};
use hello_cluster::observability::{logging, metrics};
use hello_cluster::{AppConfig, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "hello-cluster")]
#[command(about = "Greeting backend and load-balanced frontend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Serve the greeting message and this host's name as JSON
    Backend(ServeArgs),
    /// Serve a page showing the backend's greeting, or the fallback
    Frontend(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// TOML configuration file, watched for changes
    #[arg(short, long, env = "HELLO_CLUSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (service, args) = match cli.role {
        Role::Backend(args) => (Service::Backend, args),
        Role::Frontend(args) => (Service::Frontend, args),
    };

    let mut config = startup::load_startup_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init(&config.observability);
    tracing::info!(role = service.name(), version = env!("CARGO_PKG_VERSION"), "hello-cluster starting");

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let server = build_server(service, config.clone())?;
    let listener = startup::bind(&config).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let (updates, _watcher) = match args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path);
            signals::reload_on_hangup(path, watcher.updates());
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    server.run(listener, updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[derive(Clone, Copy)]
enum Service {
    Backend,
    Frontend,
}

impl Service {
    fn name(self) -> &'static str {
        match self {
            Service::Backend => "backend",
            Service::Frontend => "frontend",
        }
    }
}

fn build_server(service: Service, config: AppConfig) -> Result<HttpServer, Box<dyn std::error::Error>> {
    match service {
        Service::Backend => {
            // Resolved once; a failure here aborts startup.
            let host_name = startup::resolve_host_name()?;
            tracing::info!(
                host_name = %host_name,
                message = %config.backend.message,
                "Configuration loaded"
            );
            Ok(HttpServer::backend(config, host_name))
        }
        Service::Frontend => {
            tracing::info!(backend = %config.frontend.backend_address, "Configuration loaded");
            Ok(HttpServer::frontend(config)?)
        }
    }
}
