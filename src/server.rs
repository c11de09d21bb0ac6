use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{middleware, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    openapi::ApiDoc,
    route,
    schema::Schema,
    state::ApiState,
    store::{memory::MemoryBookStore, postgres::PgBookStore, BookStore},
};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    #[serde(default)]
    error_verbosity: ErrorVerbosity,
    /// Schema book payloads are validated against. Defaults to the built-in schema.
    #[serde(default)]
    book_schema_file: Option<PathBuf>,
    /// Books are kept in memory if not set.
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default)]
    trace_response_bodies: bool,
}

impl ServerConfig {
    pub fn new(socket_address: SocketAddr, error_verbosity: ErrorVerbosity) -> Self {
        Self {
            socket_address,
            error_verbosity,
            book_schema_file: None,
            database_url: None,
            trace_response_bodies: false,
        }
    }

    pub async fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overrides the database url if `database_url` is set.
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if database_url.is_some() {
            self.database_url = database_url;
        }

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

    async fn state(&self) -> anyhow::Result<ApiState> {
        let book_schema = match &self.config.book_schema_file {
            Some(path) => Schema::from_file(path)
                .with_context(|| format!("Failed to load book schema: {}", path.display()))?,
            None => Schema::book().context("Failed to load built-in book schema")?,
        };

        let books: Arc<dyn BookStore> = match &self.config.database_url {
            Some(database_url) => Arc::new(
                PgBookStore::connect(database_url)
                    .await
                    .context("Failed to connect to database")?,
            ),
            None => {
                tracing::warn!("No database configured, books are kept in memory");

                Arc::new(MemoryBookStore::new())
            }
        };

        Ok(ApiState::new(self.config.error_verbosity, book_schema, books))
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let state = self.state().await?;

        let app = app(state, self.config.trace_response_bodies);

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

        Ok(())
    }
}

/// Builds the application router.
pub fn app(state: ApiState, trace_response_bodies: bool) -> Router {
    let mut router = Router::<ApiState>::new()
        .nest("/books", route::books::app::app())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(middleware::from_fn(method_not_allowed));

    if trace_response_bodies {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ));
    }

    router.with_state(state).layer(
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
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to listen for CTRL+C");

            return std::future::pending::<()>().await;
        }

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;

                tracing::info!("SIGTERM received");
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM signal handler");

                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
