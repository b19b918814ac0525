//! HTTP front end: serves the SkimLit page and the JSON API behind it.

mod error;
mod page;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use skimlit_ai::AbstractService;
use skimlit_store::MetricsStore;
use tokio::net::TcpListener;
use tracing::info;

pub use error::ApiError;
pub use page::{DEFAULT_HOME_URL, DEFAULT_PUBMED_URL, PageOptions, render_page};
pub use routes::METRICS_IMAGE_PATH;

/// Listener settings for `skimlit serve`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

/// State shared by every request handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AbstractService>,
    pub metrics: Arc<MetricsStore>,
    page: Arc<str>,
}

impl AppState {
    pub fn new(
        service: AbstractService,
        metrics: MetricsStore,
        page: &PageOptions,
    ) -> anyhow::Result<Self> {
        let page = render_page(page).context("rendering index page")?;
        Ok(Self {
            service: Arc::new(service),
            metrics: Arc::new(metrics),
            page: page.into(),
        })
    }
}

/// All routes with their shared state.
pub fn router(state: AppState) -> Router {
    routes::routes().with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(
        addr = %listener.local_addr()?,
        model = state.service.is_available(),
        metrics = state.metrics.is_available(),
        "serving SkimLit"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
