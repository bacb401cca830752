//! HTTP endpoints: multipart PDF upload, stored-result retrieval, and
//! the welcome route.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use cuadro_core::store::KvStore;

use crate::state::SharedState;

/// One extraction result. `tables` carries the engine's JSON document
/// as a string, exactly as cached.
#[derive(Serialize)]
pub struct ExtractionResponse {
    pub tables: String,
}

/// Error body in the `{"detail": ...}` shape API clients consume.
#[derive(Serialize)]
pub struct Detail {
    pub detail: String,
}

type ApiError = (StatusCode, Json<Detail>);

/// Create the service router.
pub fn router(max_upload_bytes: usize) -> Router<SharedState> {
    Router::new()
        .route("/", get(read_root))
        .route("/extract_tables", post(extract_tables))
        .route("/result/:result_id", get(get_result))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

async fn read_root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the PDF Table Extractor! Upload a PDF to extract tables."
    }))
}

/// Accept one or more PDF uploads under the `files` field and extract
/// tables from each.
///
/// Media types are validated for every part before any extraction
/// starts, so one mislabeled part rejects the whole request rather
/// than half of it. Failures inside a file do not: those surface as
/// that file's error payload while the rest of the batch proceeds.
async fn extract_tables(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ExtractionResponse>>, ApiError> {
    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("failed to read multipart field: {}", e);
        bad_request(format!("Failed to read upload: {}", e))
    })? {
        if field.name() != Some("files") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        tracing::info!(
            "received file: {}, content type: {:?}",
            filename,
            content_type
        );

        if content_type.as_deref() != Some("application/pdf") {
            return Err(bad_request(
                "Invalid file type. Only PDF files are allowed.".to_string(),
            ));
        }

        let data = field.bytes().await.map_err(|e| {
            tracing::error!("failed to read file data: {}", e);
            bad_request(format!("Failed to read file data: {}", e))
        })?;
        uploads.push((filename, data.to_vec()));
    }

    if uploads.is_empty() {
        return Err(bad_request(
            "No file provided. Use multipart field name 'files'".to_string(),
        ));
    }

    let mut results = Vec::with_capacity(uploads.len());
    for (filename, data) in uploads {
        let task_state = Arc::clone(&state);
        let tables = tokio::task::spawn_blocking(move || task_state.engine.extract(&data))
            .await
            .map_err(|e| {
                tracing::error!("extraction task failed: {}", e);
                internal_error("Extraction task failed".to_string())
            })?;

        let result_id = Uuid::new_v4().to_string();
        if let Err(e) = state.results.set(&result_id, tables.as_bytes()) {
            tracing::warn!("result store write failed for {}: {}", result_id, e);
        }
        write_debug_artifact(&state, &result_id, &tables).await;

        tracing::info!(
            "processed file: {}, saved result with ID: {}",
            filename,
            result_id
        );
        results.push(ExtractionResponse { tables });
    }

    Ok(Json(results))
}

/// Fetch a previously stored extraction result by its ID.
async fn get_result(
    State(state): State<SharedState>,
    Path(result_id): Path<String>,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let value = state.results.get(&result_id).map_err(|e| {
        tracing::error!("result store read failed for {}: {}", result_id, e);
        internal_error("Result store unavailable".to_string())
    })?;

    match value {
        Some(bytes) if !bytes.is_empty() => match String::from_utf8(bytes) {
            Ok(tables) => Ok(Json(ExtractionResponse { tables })),
            Err(_) => {
                tracing::warn!("result {} is not valid utf-8", result_id);
                Err(not_found())
            }
        },
        _ => Err(not_found()),
    }
}

/// Drop a copy of the result into the scratch directory for debugging.
/// Failure is logged, never surfaced to the client.
async fn write_debug_artifact(state: &SharedState, result_id: &str, tables: &str) {
    let path = state.config.scratch_dir.join(format!("{}.json", result_id));
    if let Err(e) = tokio::fs::write(&path, tables).await {
        tracing::warn!("debug artifact write failed for {}: {}", path.display(), e);
    }
}

fn bad_request(detail: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(Detail { detail }))
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(Detail {
            detail: "Result not found".to_string(),
        }),
    )
}

fn internal_error(detail: String) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(Detail { detail }))
}
