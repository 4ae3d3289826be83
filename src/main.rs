use std::net::SocketAddr;

use axum::Router;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mail_relay::api;
use mail_relay::config::{Config, ConfigError, DEFAULT_SERVICE};
use mail_relay::relay::Relay;
use mail_relay::state::AppState;

/// Relays email send requests to a third-party delivery provider
#[derive(Parser)]
#[command(name = "mail-relay", version, about, long_about = None)]
struct Cli {
    /// Email service provider to forward requests to
    #[arg(short = 's', long = "service", default_value = DEFAULT_SERVICE)]
    service: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load configuration; an unknown service is a usage error
    let config = match Config::from_env(&cli.service) {
        Ok(config) => config,
        Err(e @ ConfigError::UnsupportedService(_)) => {
            Cli::command().error(ErrorKind::InvalidValue, e).exit()
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        service = %config.service,
        "Configuration loaded"
    );

    let relay = Relay::from_config(&config)?;
    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(config, relay);

    // Build router
    let app = Router::new()
        .merge(api::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_service_option_spellings() {
        assert_eq!(Cli::parse_from(["mail-relay"]).service, "mailgun");
        assert_eq!(Cli::parse_from(["mail-relay", "-s", "mandrill"]).service, "mandrill");
        assert_eq!(
            Cli::parse_from(["mail-relay", "--service", "mandrill"]).service,
            "mandrill"
        );
    }

    #[test]
    fn test_unknown_service_never_builds_a_config() {
        let cli = Cli::parse_from(["mail-relay", "--service", "sendgrid"]);

        assert!(matches!(
            Config::from_lookup(&cli.service, |_| None),
            Err(ConfigError::UnsupportedService(_))
        ));
    }
}
