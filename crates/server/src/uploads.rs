//! Site photo intake and serving.
//!
//! `POST /api/upload-photos` accepts a bounded multipart batch (field name
//! `photos`), validates every file before anything touches disk, then stores
//! each under a generated name. Stored files are served back from
//! `/uploads/...`.

use std::path::{Path, PathBuf};

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tracing::{error, info};
use uuid::Uuid;

use shedquote_core::config::UploadsConfig;

use crate::api::ApiError;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "webp"];

#[derive(Clone)]
pub struct UploadState {
    pub dir: PathBuf,
    pub max_files: usize,
    pub max_file_size_bytes: u64,
}

impl UploadState {
    pub fn from_config(config: &UploadsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_files: config.max_files,
            max_file_size_bytes: config.max_file_size_bytes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_paths: Vec<String>,
}

pub fn router(state: UploadState) -> Router {
    // Whole-batch ceiling: every file at the per-file cap, plus form overhead.
    let body_limit =
        state.max_files * state.max_file_size_bytes as usize + 1024 * 1024;

    Router::new()
        .route("/api/upload-photos", post(upload_photos))
        .layer(DefaultBodyLimit::max(body_limit))
        .nest_service("/uploads", ServeDir::new(state.dir.clone()))
        .with_state(state)
}

pub async fn upload_photos(
    State(state): State<UploadState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ApiError>)> {
    let mut staged: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| bad_request(format!("invalid multipart request: {error}")))?
    {
        if field.name() != Some("photos") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| bad_request("uploaded file is missing a file name".to_string()))?;
        let content_type = field.content_type().map(ToString::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|error| bad_request(format!("could not read uploaded file: {error}")))?;

        if staged.len() == state.max_files {
            return Err(bad_request(format!(
                "too many files: at most {} photos per request",
                state.max_files
            )));
        }

        validate_photo(&file_name, content_type.as_deref(), data.len(), state.max_file_size_bytes)
            .map_err(bad_request)?;

        staged.push((file_name, data.to_vec()));
    }

    if staged.is_empty() {
        return Err(bad_request("no files uploaded".to_string()));
    }

    // Validation is complete for the whole batch; only now do writes begin.
    tokio::fs::create_dir_all(&state.dir).await.map_err(io_error)?;

    let mut file_paths = Vec::with_capacity(staged.len());
    for (original_name, data) in staged {
        let extension = file_extension(&original_name).unwrap_or("jpg").to_ascii_lowercase();
        let stored_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        tokio::fs::write(state.dir.join(&stored_name), &data).await.map_err(io_error)?;
        file_paths.push(format!("/uploads/{stored_name}"));
    }

    info!(
        event_name = "uploads.photos_stored",
        count = file_paths.len(),
        "site photos stored"
    );

    Ok(Json(UploadResponse { success: true, file_paths }))
}

/// Reject a file before any write: extension and (when present) MIME subtype
/// must be on the image allowlist, and the payload must be non-empty and
/// within the per-file cap.
fn validate_photo(
    file_name: &str,
    content_type: Option<&str>,
    size: usize,
    max_file_size_bytes: u64,
) -> Result<(), String> {
    let extension = file_extension(file_name)
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| format!("`{file_name}` has no file extension"))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "only image files ({}) are allowed",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }

    if let Some(content_type) = content_type {
        let subtype = content_type.strip_prefix("image/").unwrap_or("");
        if !ALLOWED_EXTENSIONS.contains(&subtype) {
            return Err(format!("unsupported content type `{content_type}`"));
        }
    }

    if size == 0 {
        return Err(format!("`{file_name}` is empty"));
    }

    if size as u64 > max_file_size_bytes {
        return Err(format!(
            "`{file_name}` exceeds the {max_file_size_bytes}-byte per-file limit"
        ));
    }

    Ok(())
}

fn file_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|extension| extension.to_str())
}

fn bad_request(message: String) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError { error: message }))
}

fn io_error(error: std::io::Error) -> (StatusCode, Json<ApiError>) {
    error!(event_name = "uploads.write_failed", error = %error, "photo storage failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError { error: "failed to store uploaded photos".to_string() }),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::{router, validate_photo, UploadState};

    const BOUNDARY: &str = "shedquote-test-boundary";

    fn state(dir: &std::path::Path) -> UploadState {
        UploadState {
            dir: dir.to_path_buf(),
            max_files: 5,
            max_file_size_bytes: 5 * 1024 * 1024,
        }
    }

    fn multipart_body(files: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (file_name, content_type, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photos\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/upload-photos")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(axum::body::Body::from(body))
            .expect("request")
    }

    #[test]
    fn validate_photo_enforces_the_allowlist_and_size_cap() {
        assert!(validate_photo("site.png", Some("image/png"), 1024, 5_242_880).is_ok());
        assert!(validate_photo("site.JPG", Some("image/jpeg"), 1024, 5_242_880).is_ok());

        // gif is rejected even when small
        assert!(validate_photo("site.gif", Some("image/gif"), 1024, 5_242_880).is_err());
        // extension/MIME mismatch is rejected
        assert!(validate_photo("site.png", Some("application/pdf"), 1024, 5_242_880).is_err());
        // oversize is rejected
        assert!(validate_photo("site.jpg", Some("image/jpeg"), 6 * 1024 * 1024, 5_242_880).is_err());
        // empty and extension-less files are rejected
        assert!(validate_photo("site.png", Some("image/png"), 0, 5_242_880).is_err());
        assert!(validate_photo("site", Some("image/png"), 1024, 5_242_880).is_err());
    }

    #[tokio::test]
    async fn stores_accepted_photos_under_generated_names() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let router = router(state(dir.path()));

        let body = multipart_body(&[
            ("site-a.png", "image/png", b"png-bytes"),
            ("site-b.jpg", "image/jpeg", b"jpg-bytes"),
        ]);
        let response = router.oneshot(upload_request(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.expect("body");
        let wire: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        let paths = wire["filePaths"].as_array().expect("paths");
        assert_eq!(paths.len(), 2);

        for path in paths {
            let path = path.as_str().expect("path string");
            let file_name = path.strip_prefix("/uploads/").expect("uploads prefix");
            assert!(dir.path().join(file_name).is_file(), "stored file should exist");
        }
    }

    #[tokio::test]
    async fn rejects_disallowed_types_without_storing_anything() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let router = router(state(dir.path()));

        let body = multipart_body(&[
            ("site-a.png", "image/png", b"png-bytes"),
            ("animation.gif", "image/gif", b"gif-bytes"),
        ]);
        let response = router.oneshot(upload_request(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stored: Vec<_> = std::fs::read_dir(dir.path())
            .map(|entries| entries.collect())
            .unwrap_or_default();
        assert!(stored.is_empty(), "a rejected batch must not leave files behind");
    }

    #[tokio::test]
    async fn rejects_an_empty_batch() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let router = router(state(dir.path()));

        let response =
            router.oneshot(upload_request(multipart_body(&[]))).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_batches_over_the_file_count_cap() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let mut capped = state(dir.path());
        capped.max_files = 2;
        let router = router(capped);

        let body = multipart_body(&[
            ("a.png", "image/png", b"bytes"),
            ("b.png", "image/png", b"bytes"),
            ("c.png", "image/png", b"bytes"),
        ]);
        let response = router.oneshot(upload_request(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
