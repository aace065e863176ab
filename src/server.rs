//! HTTP surface: list, upsert, and delete over `/{collection}`.
//!
//! | Method | Path                | Success                  |
//! |--------|---------------------|--------------------------|
//! | GET    | `/:collection`      | 200, the whole collection |
//! | POST   | `/:collection`      | 200, `{"success": true}` |
//! | DELETE | `/:collection/:id`  | 200, `{"success": true}` |
//!
//! Records are only ever read a whole collection at a time.

use crate::config::ServerConfig;
use crate::error::Error;
use crate::registry::CollectionName;
use crate::store::{RecordStore, UpsertRequest};
use crate::Collection;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

/// Shared handler state.
pub type AppState = Arc<RecordStore>;

#[derive(Serialize)]
struct Success {
    success: bool,
}

const OK: Success = Success { success: true };

/// Store error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::UnknownCollection(name) => {
                warn!(collection = %name, "unrecognized collection");
                (StatusCode::NOT_FOUND, "Invalid data type").into_response()
            }
            Error::MissingField => {
                warn!("upsert body missing id or item");
                (StatusCode::BAD_REQUEST, "Missing id or item").into_response()
            }
            other => {
                error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"success": false, "error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

/// Run a store call on the blocking pool; file I/O must not stall the runtime.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError(Error::Io(format!("store task failed: {e}"))))?
        .map_err(ApiError)
}

/// First path segment as sent, for naming a collection whose percent-decoded
/// form is not UTF-8 (and so cannot be recognized).
fn raw_segment(uri: &Uri) -> String {
    uri.path().trim_start_matches('/').split('/').next().unwrap_or_default().to_string()
}

/// Collection segment, or UnknownCollection when it does not decode.
fn collection_param(
    path: Result<Path<String>, PathRejection>,
    uri: &Uri,
) -> Result<String, ApiError> {
    path.map(|Path(collection)| collection)
        .map_err(|_| ApiError(Error::UnknownCollection(raw_segment(uri))))
}

async fn list_collection(
    State(store): State<AppState>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Collection>, ApiError> {
    let collection = collection_param(path, &uri)?;
    let data = blocking(move || store.get_all(&collection)).await?;
    Ok(Json(data))
}

async fn upsert_item(
    State(store): State<AppState>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Success>, ApiError> {
    let collection = collection_param(path, &uri)?;
    let request = UpsertRequest::from_slice(&body);
    blocking(move || store.upsert(&collection, request)).await?;
    Ok(Json(OK))
}

async fn delete_item(
    State(store): State<AppState>,
    uri: Uri,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Success>, ApiError> {
    let (collection, id) = match path {
        Ok(Path(params)) => params,
        Err(_) => {
            // either segment failed to decode; an id that is not UTF-8 can
            // never be a record key, so a recognized collection is a no-op
            let collection = raw_segment(&uri);
            collection.parse::<CollectionName>()?;
            return Ok(Json(OK));
        }
    };
    blocking(move || store.delete(&collection, &id)).await?;
    Ok(Json(OK))
}

/// Build the application router around `store`, with permissive CORS and
/// request tracing.
pub fn router(store: AppState) -> Router {
    Router::new()
        .route("/:collection", get(list_collection).post(upsert_item))
        .route("/:collection/:id", delete(delete_item))
        .with_state(store)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Open the store described by `config` and serve until Ctrl-C / SIGTERM.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let store = config.store_builder().build()?;
    info!(data_dir = %store.registry().data_dir().display(), "collections ready");

    let app = router(Arc::new(store));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for ctrl-c");
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
                error!(error = %e, "cannot listen for SIGTERM");
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
}
