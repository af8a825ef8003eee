//! HTTP front end for the repository.
//!
//! Every file lives under `/repository/`, the root a Maven client is pointed at. `GET` and `HEAD`
//! are handed to [`Repository`]; any other method on a repository path gets 405.

use crate::Result;
use crate::repository::{Repository, RepositoryResponse};
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use core::future::Future;
use ohno::IntoAppError;
use std::sync::Arc;
use tokio::net::TcpListener;

const LOG_TARGET: &str = "    server";

/// Build the router serving `repository` under `/repository/`.
pub fn router(repository: Arc<Repository>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/repository/{*path}", get(get_file).head(head_file))
        .with_state(repository)
}

/// Serve `repository` on `listener` until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the listener fails while accepting connections
pub async fn serve<F>(listener: TcpListener, repository: Repository, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!(target: LOG_TARGET, "Serving the repository at http://{addr}/repository/");
    }

    axum::serve(listener, router(Arc::new(repository)))
        .with_graceful_shutdown(shutdown)
        .await
        .into_app_err("serving repository requests")?;

    log::info!(target: LOG_TARGET, "Server shutdown complete");
    Ok(())
}

/// Resolves once the process is asked to stop with Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!(target: LOG_TARGET, "Could not install the Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                let _ = stream.recv().await;
            }
            Err(e) => log::error!(target: LOG_TARGET, "Could not install the SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::info!(target: LOG_TARGET, "Received Ctrl+C, shutting down"),
        () = terminate => log::info!(target: LOG_TARGET, "Received SIGTERM, shutting down"),
    }
}

async fn root() -> &'static str {
    concat!("maven-bridge ", env!("CARGO_PKG_VERSION"), ": point your Maven client at /repository/\n")
}

async fn get_file(State(repository): State<Arc<Repository>>, Path(path): Path<String>) -> RepositoryResponse {
    repository.get(&path).await
}

async fn head_file(State(repository): State<Arc<Repository>>, Path(path): Path<String>) -> RepositoryResponse {
    repository.head(&path).await
}

impl IntoResponse for RepositoryResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = self.detail();

        let mut builder = Response::builder().status(status);
        for (name, value) in self.headers() {
            builder = builder.header(name, value);
        }

        let body = match self {
            Self::Document { body, .. } => Body::from(body),
            Self::Headers { .. } | Self::Redirect { .. } => Body::empty(),
            Self::NotFound(_) | Self::BadRequest(_) | Self::MethodNotAllowed | Self::UpstreamFailure(_) => {
                builder = builder.header(header::CONTENT_TYPE, "text/plain; charset=utf-8");
                Body::from(detail.unwrap_or_default())
            }
        };

        builder.body(body).unwrap_or_else(|e| {
            log::error!(target: LOG_TARGET, "Could not build response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
    }
}
