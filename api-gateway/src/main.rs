//! Accounts HTTP server

use std::net::SocketAddr;
use std::sync::Arc;

use account_service::AccountService;
use api_gateway::{config::AppConfig, router, AppState};
use clap::Parser;
use common::error::IntoError;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

/// Accounts API server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening address (overrides ADDR)
    #[clap(short, long)]
    addr: Option<String>,

    /// PostgreSQL URL (overrides DATABASE_URL); in-memory store when unset
    #[clap(short, long)]
    database_url: Option<String>,

    /// Log level directive, e.g. `info` or `api_gateway=debug`
    #[clap(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let mut config = AppConfig::new();
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if let Some(url) = args.database_url {
        config.accounts.database_url = Some(url);
    }

    // Initialize logging with debug level when DEBUG=1 env var is set
    let log_level = if config.debug { Level::DEBUG } else { Level::INFO };
    let directives = args
        .log_level
        .unwrap_or_else(|| "tower_http=debug,api_gateway=debug,account_service=debug".to_string());

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse(directives)?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Debug logging enabled");

    // Initialize services
    let account_service = Arc::new(AccountService::with_config(&config.accounts).await?);
    let state = AppState::new(account_service);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(log_level))
            .on_request(DefaultOnRequest::new().level(log_level))
            .on_response(DefaultOnResponse::new().level(log_level)),
    );

    // Start the server
    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e: std::net::AddrParseError| e.into_error("Invalid listen address"))?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    // Run until interrupt signal
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
