//! HTTP transport for the todo resource.
//!
//! Mounts one dispatch handler for everything under `/todos`. The handler
//! does no routing of its own beyond stripping the prefix: it converts the
//! axum request into a plain-data `HttpRequest`, lets `todo_core::Resources`
//! decide the outcome on a blocking thread, and writes the answer back.
//!
//! The path remainder is percent-decoded before it reaches the core, so
//! `/todos/%31` addresses item 1. The body is taken as raw bytes and decoded
//! lossily: stray non-UTF-8 bytes turn into U+FFFD inside their own pair
//! instead of failing the whole request.

pub mod config;
pub mod sqlite;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use todo_core::{HttpMethod, HttpRequest, HttpResponse, Resources};

pub use config::{Config, ConfigError, Database};
pub use sqlite::SqliteStore;

pub const RESOURCE_PREFIX: &str = "/todos";

pub fn app(resources: Resources) -> Router {
    Router::new()
        .route(RESOURCE_PREFIX, any(dispatch))
        .fallback(dispatch)
        .with_state(resources)
}

/// Serve until Ctrl-C, then drain in-flight requests.
pub async fn run(listener: TcpListener, resources: Resources) -> Result<(), std::io::Error> {
    axum::serve(listener, app(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Split a request path into the part after `/todos`.
///
/// `None` means the path is outside the resource. `Some(None)` is the bare
/// collection URL.
fn resource_remainder(path: &str) -> Option<Option<&str>> {
    let rest = path.strip_prefix(RESOURCE_PREFIX)?;
    if rest.is_empty() {
        Some(None)
    } else if rest.starts_with('/') {
        Some(Some(rest))
    } else {
        None
    }
}

/// Percent-decode a path remainder. Undecodable bytes become U+FFFD, which
/// the classifier then rejects.
fn decode_path(remainder: &str) -> String {
    percent_decode_str(remainder).decode_utf8_lossy().into_owned()
}

async fn dispatch(
    State(resources): State<Resources>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let Some(remainder) = resource_remainder(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let request = HttpRequest {
        method: HttpMethod::parse(method.as_str()),
        path: remainder.map(decode_path),
        query: uri.query().map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    match tokio::task::spawn_blocking(move || resources.handle(&request)).await {
        Ok(Ok(response)) => into_response(response),
        Ok(Err(err)) => {
            tracing::error!(%method, path = uri.path(), error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            tracing::error!(%method, path = uri.path(), error = %err, "handler task aborted");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn into_response(response: HttpResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut out = (status, Body::from(response.body)).into_response();
    for (name, value) in response.headers {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                out.headers_mut().insert(name, value);
            }
            _ => tracing::warn!("dropping unrepresentable response header"),
        }
    }
    out
}
