//! In-process API tests driving the router with tower's `oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use cuadro_core::store::KvStore;
use cuadro_server::config::Config;
use cuadro_server::routes;
use cuadro_server::state::{AppState, SharedState};

const BOUNDARY: &str = "cuadro-test-boundary";

fn test_app(scratch_dir: &std::path::Path) -> (Router, SharedState) {
    let config = Config {
        scratch_dir: scratch_dir.to_path_buf(),
        ..Default::default()
    };
    let state = AppState::new(config);
    let app = routes::router(state.config.max_upload_bytes).with_state(std::sync::Arc::clone(&state));
    (app, state)
}

/// Single-page PDF with one line of Helvetica text.
fn minimal_pdf() -> Vec<u8> {
    let content = "BT\n/F1 12 Tf\n72 720 Td\n(Hello upload) Tj\nET\n";
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n");
    for obj in [
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
        "2 0 obj\n<< /Type /Pages /Kids [4 0 R] /Count 1 >>\nendobj\n".to_string(),
        "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n".to_string(),
        "4 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 3 0 R >> >> /Contents 5 0 R >>\nendobj\n"
            .to_string(),
        format!(
            "5 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
            content.len(),
            content
        ),
    ] {
        offsets.push(out.len());
        out.extend_from_slice(obj.as_bytes());
    }

    let xref_pos = out.len();
    out.extend_from_slice(b"xref\n0 6\n0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!("trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n{xref_pos}\n%%EOF").as_bytes(),
    );
    out
}

struct Part<'a> {
    name: &'a str,
    filename: &'a str,
    content_type: &'a str,
    data: &'a [u8],
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                part.name, part.filename, part.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract_tables")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_welcome_route() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert_eq!(
        value["message"],
        "Welcome to the PDF Table Extractor! Upload a PDF to extract tables."
    );
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_content_type() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let parts = [Part {
        name: "files",
        filename: "notes.txt",
        content_type: "text/plain",
        data: b"just text",
    }];
    let response = app.oneshot(upload_request(&parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let value = body_json(response).await;
    assert_eq!(value["detail"], "Invalid file type. Only PDF files are allowed.");
}

#[tokio::test]
async fn test_upload_without_files_field_is_rejected() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let pdf = minimal_pdf();
    let parts = [Part {
        name: "attachment",
        filename: "doc.pdf",
        content_type: "application/pdf",
        data: &pdf,
    }];
    let response = app.oneshot(upload_request(&parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let value = body_json(response).await;
    assert!(value["detail"].as_str().unwrap().starts_with("No file provided"));
}

#[tokio::test]
async fn test_upload_extracts_stores_and_serves_result() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let pdf = minimal_pdf();
    let parts = [Part {
        name: "files",
        filename: "report.pdf",
        content_type: "application/pdf",
        data: &pdf,
    }];
    let response = app.clone().oneshot(upload_request(&parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);

    // The tables field is itself a JSON document.
    let tables = entries[0]["tables"].as_str().unwrap().to_string();
    let parsed: Value = serde_json::from_str(&tables).unwrap();
    assert!(parsed.is_array());

    // A debug artifact named after the result ID lands in the scratch
    // directory, and the same ID serves the result over the API.
    let artifacts: Vec<_> = std::fs::read_dir(scratch.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(artifacts.len(), 1);

    let artifact_path = artifacts[0].path();
    let result_id = artifact_path.file_stem().unwrap().to_str().unwrap().to_string();
    assert!(Uuid::parse_str(&result_id).is_ok());
    assert_eq!(std::fs::read_to_string(&artifact_path).unwrap(), tables);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/result/{result_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert_eq!(value["tables"].as_str().unwrap(), tables);
}

#[tokio::test]
async fn test_upload_batch_yields_one_entry_per_file() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let pdf = minimal_pdf();
    let parts = [
        Part {
            name: "files",
            filename: "a.pdf",
            content_type: "application/pdf",
            data: &pdf,
        },
        Part {
            name: "files",
            filename: "b.pdf",
            content_type: "application/pdf",
            data: &pdf,
        },
    ];
    let response = app.oneshot(upload_request(&parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_corrupt_pdf_still_yields_a_result_entry() {
    // Extraction failures are carried inside the entry's tables
    // document, not as an HTTP error.
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let parts = [Part {
        name: "files",
        filename: "broken.pdf",
        content_type: "application/pdf",
        data: b"%PDF-1.4 but nothing else",
    }];
    let response = app.oneshot(upload_request(&parts)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    let tables = value[0]["tables"].as_str().unwrap();
    let parsed: Value = serde_json::from_str(tables).unwrap();
    assert!(
        parsed["error"]
            .as_str()
            .unwrap()
            .starts_with("An error occurred: ")
    );
}

#[tokio::test]
async fn test_result_not_found() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, _state) = test_app(scratch.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/result/b2f5b9d6-0000-0000-0000-000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let value = body_json(response).await;
    assert_eq!(value["detail"], "Result not found");
}

#[tokio::test]
async fn test_empty_stored_result_reads_as_missing() {
    let scratch = tempfile::tempdir().unwrap();
    let (app, state) = test_app(scratch.path());

    state.results.set("empty-entry", b"").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/result/empty-entry")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
