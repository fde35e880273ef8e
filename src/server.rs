use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    route,
    state::ApiState,
    store::{BookStore, DatabaseConfig},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    error_verbosity: ErrorVerbosity,
    /// Logs every response body. Expensive.
    #[serde(default)]
    trace_response_body: bool,
    database: DatabaseConfig,
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::Read)?;

        serde_yaml::from_str(&content).map_err(ConfigError::Parse)
    }

    pub fn with_database_url(mut self, url: String) -> Self {
        self.database.url = url;
        self
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let books = BookStore::connect(&self.config.database)
            .await
            .context("Failed to open book store")?;

        books
            .migrate()
            .await
            .context("Failed to migrate book store")?;

        let state = ApiState::new(self.config.error_verbosity, books.clone());
        let app = app(state, self.config.trace_response_body);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        books.close().await;

        Ok(())
    }
}

/// Assembles the router with all routes and layers.
pub(crate) fn app(state: ApiState, with_response_body_tracing: bool) -> Router {
    let router = Router::new()
        .merge(route::books::app::app())
        .route("/openapi.json", get(route::openapi::openapi))
        .fallback(not_found::<ApiState>);

    let router = match with_response_body_tracing {
        true => router.layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        )),
        false => router,
    };

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed::<ApiState>,
        ))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
