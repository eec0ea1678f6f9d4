use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::service::automation::WeeklyTrends;

/// How long in-flight requests may run after a shutdown signal.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// `GET /` runs the weekly trends report.
pub fn router(job: Arc<WeeklyTrends>) -> Router {
    Router::new()
        .route("/", get(handle))
        .layer(TraceLayer::new_for_http())
        .with_state(job)
}

async fn handle(State(job): State<Arc<WeeklyTrends>>) -> Response {
    // Dropping this future (client gone) cancels any outbound call in flight.
    let anchor = job.today();

    match job.run(anchor).await {
        Ok(_) => (StatusCode::OK, "ok").into_response(),
        Err(err) => {
            error!(
                failed_in = ?err.phase(),
                %anchor,
                "{err}"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn error_response(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

/// Serve until `shutdown` resolves, then drain for at most [`SHUTDOWN_TIMEOUT`].
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    serve_with_drain(listener, app, shutdown, SHUTDOWN_TIMEOUT).await
}

/// Like [`serve`], with the drain bound given by the caller.
pub async fn serve_with_drain<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    drain: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let signal = {
        let draining = draining.clone();
        async move {
            shutdown.await;
            info!("terminating...");
            draining.notify_one();
        }
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        res = server => {
            res?;
            info!("shutdown completed");
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(drain).await;
        } => {
            warn!(timeout = ?drain, "in-flight requests still running; exiting anyway");
        }
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for SIGINT: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "received signal"),
        _ = terminate => info!(signal = "SIGTERM", "received signal"),
    }
}
