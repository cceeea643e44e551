//! Gateway adapter binary.
//!
//! # Modes
//!
//! ```text
//!   lambda (default)   Lambda runtime API ─▶ adapter ─▶ Lambda runtime API
//!   serve              HTTP client ─▶ local listener ─▶ adapter ─▶ HTTP client
//!   invoke             event JSON (file/stdin) ─▶ adapter ─▶ stdout
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use gateway_adapter::config::{resolve_config, AdapterConfig};
use gateway_adapter::http::HttpServer;
use gateway_adapter::lifecycle::{startup, Shutdown};
use gateway_adapter::observability::{logging, metrics};
use gateway_adapter::GatewayAdapter;

type BoxError = lambda_runtime::Error;

#[derive(Parser)]
#[command(name = "gateway-adapter")]
#[command(about = "Serve an HTTP route table behind an API Gateway Lambda proxy", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "GATEWAY_ADAPTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run under the AWS Lambda runtime (default)
    Lambda,
    /// Run a local HTTP server that emulates the gateway
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Run a single event through the adapter and print the response
    Invoke {
        /// Event JSON file, or "-" for stdin
        #[arg(default_value = "-")]
        event: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(Commands::Serve { bind: Some(bind) }) = &cli.command {
        config.listener.bind_address = bind.clone();
    }

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("logging already initialized: {}", e);
    }

    let adapter = startup::build_adapter(&config)?;

    match cli.command.unwrap_or(Commands::Lambda) {
        Commands::Lambda => gateway_adapter::lambda::run(adapter).await,
        Commands::Serve { .. } => serve(config, adapter).await,
        Commands::Invoke { event } => invoke(&adapter, &event),
    }
}

async fn serve(config: AdapterConfig, adapter: GatewayAdapter) -> Result<(), BoxError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        stage = %config.service.stage,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    HttpServer::new(config, adapter)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn invoke(adapter: &GatewayAdapter, source: &str) -> Result<(), BoxError> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };

    let event: serde_json::Value = serde_json::from_str(&raw)?;
    let response = adapter.handle_value(event);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
