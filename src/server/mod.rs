//! HTTP server exposing one `POST` endpoint per external command.
//!
//! Routes are the lowercase command names (`/acknowledge_host_problem`,
//! `/schedule_host_downtime`, ...). A command responds 200 with an empty body
//! once its line is written, 400 with `Error: <detail>` when the body does
//! not encode, and 500 when the command file could not be written.

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::channel::{ChannelWriter, CommandFile};
use crate::clock::{Clock, SystemClock};
use crate::config::ResolvedSettings;
use crate::protocol::catalog;
use crate::{Error, Result};

pub use error::{ApiError, WRITE_FAILED_BODY};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Serialized writer to the daemon's command channel
    pub writer: ChannelWriter,
    /// Source of check-time tokens
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(writer: ChannelWriter, clock: Arc<dyn Clock>) -> Self {
        Self { writer, clock }
    }
}

/// Build the router for every catalog command plus the informational routes.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/commands", get(handlers::list_commands))
        .route("/health", get(handlers::health));

    for spec in catalog::all() {
        app = app.route(
            &spec.route(),
            post(move |State(state): State<AppState>, body: Bytes| {
                handlers::submit_command(state, spec, body)
            }),
        );
    }

    app.fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C.
pub async fn serve(settings: &ResolvedSettings) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sink = Arc::new(CommandFile::new(settings.command_file(), Arc::clone(&clock)));
    let writer = ChannelWriter::new(sink, settings.write_timeout());
    let app = router(AppState::new(writer, clock));

    let addr = settings.listen();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Other(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(
        listen = %addr,
        command_file = %settings.command_file().display(),
        object_cache_file = %settings.object_cache_file.value.display(),
        status_file = %settings.status_file.value.display(),
        write_timeout_ms = settings.write_timeout_ms.value,
        commands = catalog::all().len(),
        "starting nagios-api"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
