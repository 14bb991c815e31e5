use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::error::AppError;
use crate::pipeline::TranslationResult;
use crate::state::AppState;
use crate::upload::UploadForm;

pub const PING_MESSAGE: &str = "Text extraction service running";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/ping", get(ping))
        // Upload, extract and translate
        .route("/extract-text", post(extract_text))
}

/// Full application: routes, upload size limit, tracing and CORS
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;

    create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": PING_MESSAGE }))
}

async fn extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranslationResult>, AppError> {
    // A body that is not multipart carries no file at all
    let form = match multipart {
        Ok(multipart) => UploadForm::from_multipart(multipart).await?,
        Err(rejection) => {
            debug!("Request without multipart body: {}", rejection);
            UploadForm::default()
        }
    };

    let result = state.pipeline.handle(form).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ExtractionError;
    use crate::extract::{Extractor, OcrEngine, PdfTextReader};
    use crate::pipeline::Pipeline;
    use crate::segment::SegmenterRegistry;
    use crate::translate::{TranslationService, Translator};
    use crate::upload::UploadStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const BOUNDARY: &str = "----doc-translate-test";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_request(parts: &[Part]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/extract-text")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Stub PDF reader returning fixed pages, or failing when `None`
    struct StubPdf(Option<Vec<&'static str>>);

    #[async_trait]
    impl PdfTextReader for StubPdf {
        async fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
            assert!(path.exists());
            match &self.0 {
                Some(pages) => Ok(pages.iter().map(|p| p.to_string()).collect()),
                None => Err(ExtractionError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "corrupt xref table",
                ))),
            }
        }
    }

    #[derive(Default)]
    struct StubOcr {
        text: &'static str,
        hints: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OcrEngine for StubOcr {
        async fn recognize(&self, _path: &Path, hint: &str) -> Result<String, ExtractionError> {
            self.hints.lock().unwrap().push(hint.to_string());
            Ok(self.text.to_string())
        }
    }

    /// Prefixes the input, or fails when `fail` is set
    struct StubTranslator {
        fail: bool,
    }

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate(&self, text: &str, _max_length: usize) -> anyhow::Result<String> {
            if self.fail {
                anyhow::bail!("CUDA out of memory at model.generate");
            }
            Ok(format!("EN({})", text))
        }
    }

    struct Harness {
        upload_dir: tempfile::TempDir,
        ocr: Arc<StubOcr>,
        app: Router,
    }

    impl Harness {
        fn new(pdf: StubPdf, ocr_text: &'static str, translation_fails: bool) -> Self {
            Self::with_config(pdf, ocr_text, translation_fails, Config::default())
        }

        fn with_upload_limit(max_upload_bytes: usize) -> Self {
            let mut config = Config::default();
            config.server.max_upload_bytes = max_upload_bytes;
            Self::with_config(StubPdf(Some(vec!["Hello World"])), "", false, config)
        }

        fn with_config(
            pdf: StubPdf,
            ocr_text: &'static str,
            translation_fails: bool,
            config: Config,
        ) -> Self {
            let upload_dir = tempfile::tempdir().unwrap();
            let ocr = Arc::new(StubOcr {
                text: ocr_text,
                ..StubOcr::default()
            });
            let pipeline = Pipeline::new(
                UploadStore::new(upload_dir.path()),
                Extractor::new(Arc::new(pdf), ocr.clone()),
                SegmenterRegistry::default(),
                TranslationService::new(
                    Arc::new(StubTranslator {
                        fail: translation_fails,
                    }),
                    512,
                    1,
                ),
            );
            let app = app(AppState::from_parts(config, pipeline));
            Self {
                upload_dir,
                ocr,
                app,
            }
        }

        fn standard() -> Self {
            Self::new(StubPdf(Some(vec!["Hello World"])), "", false)
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        fn upload_dir_is_empty(&self) -> bool {
            std::fs::read_dir(self.upload_dir.path())
                .unwrap()
                .next()
                .is_none()
        }
    }

    #[tokio::test]
    async fn ping_reports_running() {
        let harness = Harness::standard();
        let request = Request::get("/ping").body(Body::empty()).unwrap();

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": PING_MESSAGE }));
    }

    #[tokio::test]
    async fn pdf_upload_is_extracted_and_translated() {
        let harness = Harness::standard();
        let request = multipart_request(&[
            Part::Text("source_lang", "ne"),
            Part::File("file", "hello.pdf", b"%PDF-1.5"),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "source_lang": "ne",
                "extracted_text": "Hello World",
                "translated_text": "EN(Hello World)",
            })
        );
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn sinhala_image_uses_sin_ocr_hint() {
        let harness = Harness::new(StubPdf(Some(vec![])), "  සිංහල\n\nපෙළ ", false);
        let request = multipart_request(&[
            Part::File("file", "photo.PNG", b"\x89PNG"),
            Part::Text("source_lang", "SI"),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source_lang"], "si");
        assert_eq!(body["extracted_text"], "සිංහල පෙළ");
        assert_eq!(body["translated_text"], "EN(සිංහල පෙළ)");
        assert_eq!(*harness.ocr.hints.lock().unwrap(), vec!["sin"]);
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn language_defaults_to_ne() {
        let harness = Harness::standard();
        let request = multipart_request(&[Part::File("file", "hello.pdf", b"%PDF")]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source_lang"], "ne");
    }

    #[tokio::test]
    async fn unsupported_language_is_rejected_without_writing() {
        let harness = Harness::standard();
        let request = multipart_request(&[
            Part::File("file", "hello.pdf", b"%PDF"),
            Part::Text("source_lang", "en"),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Unsupported source_lang. Use 'ne', 'nep', 'si', or 'sin'." })
        );
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn missing_file_part() {
        let harness = Harness::standard();
        let request = multipart_request(&[Part::Text("source_lang", "nep")]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn non_multipart_body_has_no_file() {
        let harness = Harness::standard();
        let request = Request::post("/extract-text")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn malformed_multipart_body() {
        let harness = Harness::standard();
        let body = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.pdf\"",
            BOUNDARY
        );
        let request = Request::post("/extract-text")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid multipart request" }));
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let harness = Harness::with_upload_limit(16);
        let request = multipart_request(&[
            Part::Text("source_lang", "ne"),
            Part::File("file", "big.pdf", &[b'x'; 4096]),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "File too large" }));
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn size_limit_applies_before_field_validation() {
        // Fields are read in full before any of them is validated
        let harness = Harness::with_upload_limit(16);
        let request = multipart_request(&[
            Part::Text("source_lang", "xx"),
            Part::File("file", "big.pdf", &[b'x'; 4096]),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "File too large" }));
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn trailing_dot_pdf_name_is_read_as_pdf() {
        let harness = Harness::standard();
        let request = multipart_request(&[Part::File("file", "report.pdf.", b"%PDF-1.5")]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["extracted_text"], "Hello World");
        assert!(harness.ocr.hints.lock().unwrap().is_empty());
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn empty_filename() {
        let harness = Harness::standard();
        let request = multipart_request(&[
            Part::Text("source_lang", "si"),
            Part::File("file", "", b""),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Empty filename" }));
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn blank_ocr_output_means_no_text() {
        let harness = Harness::new(StubPdf(Some(vec![])), " \u{0}\n\t\u{7F} ", false);
        let request = multipart_request(&[
            Part::Text("source_lang", "nep"),
            Part::File("file", "blank.jpg", b"\xFF\xD8\xFF"),
        ]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No text detected" }));
        assert_eq!(*harness.ocr.hints.lock().unwrap(), vec!["nep"]);
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_is_a_500_without_detail() {
        let harness = Harness::new(StubPdf(None), "", false);
        let request = multipart_request(&[Part::File("file", "broken.pdf", b"junk")]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Text extraction failed", "code": "extraction_failed" })
        );
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn translation_failure_is_a_500_without_detail() {
        let harness = Harness::new(StubPdf(Some(vec!["Hello World"])), "", true);
        let request = multipart_request(&[Part::File("file", "hello.pdf", b"%PDF")]);

        let (status, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "translation_failed");
        assert!(!body["error"].as_str().unwrap().contains("CUDA"));
        assert!(harness.upload_dir_is_empty());
    }

    #[tokio::test]
    async fn upload_dir_is_empty_for_every_accepted_language() {
        for lang in ["ne", "nep", "si", "sin", "NE", "Sin"] {
            let harness = Harness::new(StubPdf(Some(vec!["text"])), "ocr", false);
            for filename in ["doc.pdf", "scan.jpg"] {
                let request = multipart_request(&[
                    Part::Text("source_lang", lang),
                    Part::File("file", filename, b"bytes"),
                ]);
                let (status, _) = harness.send(request).await;
                assert_eq!(status, StatusCode::OK, "lang={} file={}", lang, filename);
                assert!(harness.upload_dir_is_empty());
            }
        }
    }
}
