//! Main Entrypoint for the Callbridge API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing the database connection pool and running migrations.
//! 3. Constructing the tunnel resolver, Twilio client and call initiator.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use callbridge_api::{
    config::{Config, TunnelProvider},
    db::Db,
    router::create_router,
    state::AppState,
};
use callbridge_core::{
    initiator::CallInitiator,
    session::SessionRegistry,
    telephony::TwilioClient,
    tunnel::{NgrokTunnelResolver, StaticTunnelResolver, TunnelResolver},
};
use sqlx::PgPool;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

fn tunnel_resolver(config: &Config, http: reqwest::Client) -> Arc<dyn TunnelResolver> {
    match &config.tunnel {
        TunnelProvider::Ngrok {
            api_url,
            callback_tunnel,
            stream_tunnel,
        } => {
            info!(%api_url, %callback_tunnel, %stream_tunnel, "Using ngrok tunnel discovery.");
            Arc::new(NgrokTunnelResolver::new(
                http,
                api_url.clone(),
                callback_tunnel.clone(),
                stream_tunnel.clone(),
            ))
        }
        TunnelProvider::Static {
            callback_base_url,
            stream_base_url,
        } => {
            info!(%callback_base_url, %stream_base_url, "Using static tunnel endpoints.");
            Arc::new(StaticTunnelResolver::new(callback_base_url, stream_base_url))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Database ---
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let db = Arc::new(Db::new(pool));
    db.run_migrations().await?;
    info!("Database connection established and migrations are up-to-date.");

    // --- 4. Initialize Shared Services ---
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let telephony = Arc::new(TwilioClient::new(
        http.clone(),
        config.twilio.api_base.clone(),
        config.twilio.account_sid.clone(),
        config.twilio.auth_token.clone(),
    ));

    let initiator = Arc::new(CallInitiator::new(
        SessionRegistry::new(db),
        tunnel_resolver(&config, http),
        telephony,
        config.twilio.phone_number.clone(),
    ));

    let app_state = Arc::new(AppState { initiator });

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        bind_address = %config.bind_address,
        from_number = %config.twilio.phone_number,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
