//! The HTTP surface, started by the `serve` subcommand. Every handler
//! validates its input, calls into `Engine`, and maps the result to the
//! `{success, data|error}` envelope — no ranking or indexing logic lives
//! here.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use lexara_core::{Document, Engine, LexaraError, SearchMode, SearchOptions};
use lexara_store::HeedStore;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub type SharedEngine = Arc<Engine<HeedStore>>;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                data: Some(data),
                message: None,
                error: None,
            }),
        )
    }
}

fn error_response<T: Serialize>(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            message: None,
            error: Some(message.into()),
        }),
    )
}

fn engine_error_status(err: &LexaraError) -> StatusCode {
    match err {
        LexaraError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        LexaraError::Closed | LexaraError::Store(_) | LexaraError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/documents", post(insert_document))
        .route("/documents/batch", post(insert_batch))
        .route("/documents/:id", get(get_document))
        .route("/documents/:id", put(update_document))
        .route("/documents/:id", delete(delete_document))
        .route("/search", get(search))
        .route("/stats", get(stats))
        .with_state(engine)
}

async fn health() -> impl IntoResponse {
    ApiResponse::ok("OK")
}

#[derive(Debug, Deserialize)]
struct DocumentBody {
    #[serde(default)]
    id: String,
    title: String,
    content: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

impl DocumentBody {
    fn into_document(self) -> Document {
        Document {
            id: self.id,
            title: self.title,
            content: self.content,
            url: self.url,
            metadata: self.metadata,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id must not be empty".to_string());
        }
        if self.title.is_empty() {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }
}

async fn insert_document(State(engine): State<SharedEngine>, Json(body): Json<DocumentBody>) -> Response {
    if let Err(message) = body.validate() {
        return error_response::<()>(StatusCode::BAD_REQUEST, message).into_response();
    }
    match engine.upsert(body.into_document()) {
        Ok(()) => ApiResponse::ok(()).into_response(),
        Err(e) => {
            error!(error = %e, "insert_document failed");
            error_response::<()>(engine_error_status(&e), e.to_string()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchBody {
    documents: Vec<DocumentBody>,
}

async fn insert_batch(State(engine): State<SharedEngine>, Json(body): Json<BatchBody>) -> Response {
    // Any per-document error in a batch stops the batch and returns 500,
    // including validation errors — unlike the single-document endpoint,
    // which distinguishes 400 from 500. Documents already upserted before
    // the failing one are not rolled back.
    for doc in body.documents {
        if let Err(message) = doc.validate() {
            return error_response::<()>(StatusCode::INTERNAL_SERVER_ERROR, message).into_response();
        }
        if let Err(e) = engine.upsert(doc.into_document()) {
            error!(error = %e, "batch insert failed partway through");
            return error_response::<()>(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    }
    ApiResponse::ok(()).into_response()
}

async fn get_document(State(engine): State<SharedEngine>, AxumPath(id): AxumPath<String>) -> Response {
    match engine.get(&id) {
        Ok(Some(doc)) => ApiResponse::ok(doc).into_response(),
        Ok(None) => error_response::<()>(StatusCode::NOT_FOUND, format!("document {id} not found")).into_response(),
        Err(e) => {
            error!(error = %e, "get_document failed");
            error_response::<()>(engine_error_status(&e), e.to_string()).into_response()
        }
    }
}

async fn update_document(
    State(engine): State<SharedEngine>,
    AxumPath(id): AxumPath<String>,
    Json(mut body): Json<DocumentBody>,
) -> Response {
    body.id = id;
    if let Err(message) = body.validate() {
        return error_response::<()>(StatusCode::BAD_REQUEST, message).into_response();
    }
    match engine.upsert(body.into_document()) {
        Ok(()) => ApiResponse::ok(()).into_response(),
        Err(e) => {
            error!(error = %e, "update_document failed");
            error_response::<()>(engine_error_status(&e), e.to_string()).into_response()
        }
    }
}

async fn delete_document(State(engine): State<SharedEngine>, AxumPath(id): AxumPath<String>) -> Response {
    match engine.delete(&id) {
        Ok(()) => ApiResponse::ok(()).into_response(),
        Err(e) => {
            error!(error = %e, "delete_document failed");
            error_response::<()>(engine_error_status(&e), e.to_string()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
    mode: Option<String>,
    ranked: Option<bool>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SearchResponseBody {
    documents: Vec<Document>,
    total: usize,
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<Vec<f64>>,
}

async fn search(State(engine): State<SharedEngine>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = params.query.filter(|q| !q.is_empty()) else {
        return error_response::<()>(StatusCode::BAD_REQUEST, "query is required").into_response();
    };

    let mode = match params.mode.as_deref() {
        None | Some("and") => SearchMode::And,
        Some("or") => SearchMode::Or,
        Some(other) => {
            return error_response::<()>(StatusCode::BAD_REQUEST, format!("unknown mode '{other}'")).into_response();
        }
    };

    let options = SearchOptions {
        mode,
        use_ranking: params.ranked.unwrap_or(true),
        limit: params.limit.filter(|&l| l > 0).unwrap_or(10),
        offset: params.offset.unwrap_or(0),
    };

    match engine.search(&query, options) {
        Ok(result) => ApiResponse::ok(SearchResponseBody {
            documents: result.documents,
            total: result.total,
            query,
            scores: result.scores,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "search failed");
            error_response::<()>(engine_error_status(&e), e.to_string()).into_response()
        }
    }
}

async fn stats(State(engine): State<SharedEngine>) -> Response {
    match engine.stats() {
        Ok(stats) => ApiResponse::ok(stats).into_response(),
        Err(e) => {
            error!(error = %e, "stats failed");
            error_response::<()>(engine_error_status(&e), e.to_string()).into_response()
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (if self.success { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR }, Json(self)).into_response()
    }
}

pub async fn serve(engine: SharedEngine, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(engine);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "lexara HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
