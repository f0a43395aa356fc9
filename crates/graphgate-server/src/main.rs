//! Graphgate - directory query proxy server

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::Settings;
use graphgate_api::AppState;
use graphgate_core::SecretProvider;
use graphgate_graph::{
    GraphClientFactory, KeyVaultSecretProvider, ManagedIdentity, StaticSecretProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let settings = Settings::load().context("Failed to load configuration")?;

    info!("Starting graphgate v{}", env!("CARGO_PKG_VERSION"));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = initialize_services(settings)?;
    let app = create_app(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health/live", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,graphgate=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn initialize_services(settings: Settings) -> Result<AppState> {
    let Settings {
        directory,
        graph,
        identity,
        local_client_secret,
        ..
    } = settings;

    let secrets: Arc<dyn SecretProvider> = match local_client_secret {
        Some(secret) => {
            directory
                .validate(false)
                .context("Invalid directory configuration")?;
            info!("Using locally configured client secret");
            Arc::new(StaticSecretProvider::new(secret))
        }
        None => {
            directory
                .validate(true)
                .context("Invalid directory configuration")?;
            let identity = ManagedIdentity::from_host(identity.endpoint, identity.header);
            info!(
                "Reading client secret '{}' from {}",
                directory.secret_name,
                directory.vault_uri()
            );
            Arc::new(
                KeyVaultSecretProvider::new(&directory, identity)
                    .context("Failed to create Key Vault secret provider")?,
            )
        }
    };

    info!("Graph endpoint: {}", graph.graph_base_url);
    let clients = GraphClientFactory::new(graph).context("Failed to create Graph client")?;

    Ok(AppState::new(directory, secrets, Arc::new(clients)))
}

fn create_app(state: AppState) -> Router {
    graphgate_api::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
