//! File upload handlers.

use axum::{
    Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State, multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    routing::get,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::UploadService;

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Creates the upload routes at `route`.
///
/// Routes:
/// - GET  {route} - Usage hint
/// - POST {route} - Store an uploaded file, body size unlimited
pub fn upload_routes(route: &str, service: UploadService) -> Router {
    Router::new()
        .route(route, get(upload_info).post(upload_file))
        .layer(DefaultBodyLimit::disable())
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub keep_name: bool,
}

async fn upload_info() -> &'static str {
    "POST to this address to upload files"
}

/// POST {route}[?keep_name=true]
///
/// Returns the stored file name as plain text.
async fn upload_file(
    State(service): State<UploadService>,
    params: Result<Query<UploadParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<String> {
    let Query(params) = params?;
    let mut multipart = multipart?;

    let field = multipart
        .next_field()
        .await?
        .ok_or_else(|| AppError::bad_request("multipart body has no fields"))?;

    if field.name() != Some(FILE_FIELD) {
        return Err(AppError::bad_request(format!(
            "first multipart field must be named '{}'",
            FILE_FIELD
        )));
    }

    let original_name = field
        .file_name()
        .ok_or_else(|| AppError::bad_request("file field has no file name"))?
        .to_string();

    tracing::info!(
        file_name = %original_name,
        keep_name = params.keep_name,
        "Upload request"
    );

    // The field is streamed to disk chunk by chunk
    service
        .store(&original_name, params.keep_name, field)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadSettings;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "XBOUNDARYX";

    fn app(dir: &TempDir) -> Router {
        let service = UploadService::new(&UploadSettings {
            route: "/upload".to_string(),
            target_dir: dir.path().to_path_buf(),
            filename_length: 8,
        })
        .unwrap();
        upload_routes("/upload", service)
    }

    fn multipart_body(field: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
        let disposition = match file_name {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_usage_hint() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(Request::builder().uri("/upload").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "POST to this address to upload files");
    }

    #[tokio::test]
    async fn test_upload_generated_name() {
        let dir = TempDir::new().unwrap();
        let body = multipart_body("file", Some("scan.pdf"), b"%PDF-1.7");

        let response = app(&dir)
            .oneshot(upload_request("/upload", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let name = body_text(response).await;
        assert_eq!(name.len(), "12345678.pdf".len());
        assert!(name.ends_with(".pdf"));
        assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_upload_keep_name_conflict() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("taken.txt"), b"old").unwrap();

        let kept = app(&dir)
            .oneshot(upload_request(
                "/upload?keep_name=true",
                multipart_body("file", Some("fresh.txt"), b"new"),
            ))
            .await
            .unwrap();
        assert_eq!(kept.status(), StatusCode::OK);
        assert_eq!(body_text(kept).await, "fresh.txt");

        let conflict = app(&dir)
            .oneshot(upload_request(
                "/upload?keep_name=true",
                multipart_body("file", Some("taken.txt"), b"new"),
            ))
            .await
            .unwrap();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(std::fs::read(dir.path().join("taken.txt")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_requests() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("/upload", multipart_body("document", Some("a.txt"), b"x")),
            ("/upload", multipart_body("file", None, b"x")),
            ("/upload", multipart_body("file", Some("noext"), b"x")),
            ("/upload?keep_name=true", multipart_body("file", Some(".."), b"x")),
            ("/upload?keep_name=true", multipart_body("file", Some("Makefile"), b"x")),
            ("/upload?keep_name=maybe", multipart_body("file", Some("a.txt"), b"x")),
        ];

        for (uri, body) in cases {
            let response = app(&dir).oneshot(upload_request(uri, body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }

        let not_multipart = app(&dir)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/upload")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(not_multipart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_is_not_size_limited() {
        let dir = TempDir::new().unwrap();
        let content = vec![7u8; 3 * 1024 * 1024];

        let response = app(&dir)
            .oneshot(upload_request(
                "/upload",
                multipart_body("file", Some("big.bin"), &content),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let name = body_text(response).await;
        assert_eq!(std::fs::metadata(dir.path().join(name)).unwrap().len(), content.len() as u64);
    }
}
