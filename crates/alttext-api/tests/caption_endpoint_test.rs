//! End-to-end tests for the HTTP surface.
//!
//! Each test mounts the real router on an ephemeral port with mock
//! caption and translation backends and talks to it over HTTP.

use std::io::Cursor;
use std::sync::Arc;

use alttext_api::config::ServerConfig;
use alttext_api::{build_router, AppState, CaptionPipeline};
use alttext_inference::mock::{MockCaptionBackend, MockTranslationBackend};
use alttext_inference::{CaptionEngine, Translator};
use image::{ImageFormat, Rgb, RgbImage};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

struct TestServer {
    base_url: String,
    caption: Arc<MockCaptionBackend>,
    translation: Arc<MockTranslationBackend>,
}

impl TestServer {
    async fn spawn(caption: MockCaptionBackend, translation: MockTranslationBackend) -> Self {
        Self::spawn_with_config(caption, translation, ServerConfig::default()).await
    }

    async fn spawn_with_config(
        caption: MockCaptionBackend,
        translation: MockTranslationBackend,
        config: ServerConfig,
    ) -> Self {
        let caption = Arc::new(caption);
        let translation = Arc::new(translation);
        let pipeline = CaptionPipeline::new(
            CaptionEngine::new(caption.clone()),
            Translator::new(translation.clone()),
        );
        let router = build_router(AppState::new(pipeline), &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            caption,
            translation,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_caption(&self, form: Form) -> (u16, Value) {
        let resp = reqwest::Client::new()
            .post(self.url("/caption"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

fn encoded(format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    RgbImage::from_fn(16, 12, |x, y| Rgb([(x * 15) as u8, (y * 20) as u8, 128]))
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

fn image_part(bytes: Vec<u8>, filename: &str) -> Part {
    Part::bytes(bytes).file_name(filename.to_string())
}

fn dog_server_backends() -> (MockCaptionBackend, MockTranslationBackend) {
    (
        MockCaptionBackend::with_caption("a brown dog running on the beach"),
        MockTranslationBackend::new()
            .with_translation("hi", "समुद्र तट पर दौड़ता एक भूरा कुत्ता")
            .with_translation("te", "బీచ్‌లో పరిగెడుతున్న గోధుమ రంగు కుక్క"),
    )
}

// =============================================================================
// SUCCESS PATHS
// =============================================================================

#[tokio::test]
async fn test_jpeg_without_language_returns_english() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new().part("image", image_part(encoded(ImageFormat::Jpeg), "dog.jpg"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "a brown dog running on the beach");
    assert_eq!(server.caption.call_count(), 1);
    assert_eq!(server.translation.call_count(), 0);
}

#[tokio::test]
async fn test_jpeg_with_hindi_returns_translation() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new()
        .part("image", image_part(encoded(ImageFormat::Jpeg), "dog.jpg"))
        .text("language", "hi");
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "समुद्र तट पर दौड़ता एक भूरा कुत्ता");
    assert_eq!(
        server.translation.calls(),
        vec![(
            "a brown dog running on the beach".to_string(),
            "en".to_string(),
            "hi".to_string()
        )]
    );
}

#[tokio::test]
async fn test_language_code_is_case_insensitive() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new()
        .text("language", " TE ")
        .part("image", image_part(encoded(ImageFormat::Png), "dog.png"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "బీచ్‌లో పరిగెడుతున్న గోధుమ రంగు కుక్క");
}

#[tokio::test]
async fn test_translation_failure_falls_back_to_english() {
    let server = TestServer::spawn(
        MockCaptionBackend::with_caption("a red bicycle"),
        MockTranslationBackend::failing("HTTP 503"),
    )
    .await;

    let form = Form::new()
        .part("image", image_part(encoded(ImageFormat::Jpeg), "bike.jpg"))
        .text("language", "ta");
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "a red bicycle");
    assert_eq!(server.translation.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_english() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new()
        .part("image", image_part(encoded(ImageFormat::Jpeg), "dog.jpg"))
        .text("language", "fr");
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "a brown dog running on the beach");
    assert_eq!(server.translation.call_count(), 0);
}

#[tokio::test]
async fn test_control_tokens_stripped_from_caption() {
    let server = TestServer::spawn(
        MockCaptionBackend::with_caption("<s> a cat   sleeping on a sofa</s>"),
        MockTranslationBackend::new(),
    )
    .await;

    let form = Form::new().part("image", image_part(encoded(ImageFormat::Png), "cat.png"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "a cat sleeping on a sofa");
}

#[tokio::test]
async fn test_unknown_fields_ignored() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new()
        .text("user", "alice")
        .part("image", image_part(encoded(ImageFormat::Bmp), "dog.bmp"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "a brown dog running on the beach");
}

// =============================================================================
// CLIENT ERRORS
// =============================================================================

#[tokio::test]
async fn test_missing_image_field() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new().text("language", "hi");
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 400);
    assert_eq!(body, serde_json::json!({ "error": "No image file provided" }));
    assert_eq!(server.caption.call_count(), 0);
}

#[tokio::test]
async fn test_non_multipart_body_is_missing_image() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let resp = reqwest::Client::new()
        .post(server.url("/caption"))
        .json(&serde_json::json!({ "image": "aGVsbG8=" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn test_empty_image_file() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new().part("image", image_part(Vec::new(), "empty.jpg"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Empty image file");
    assert_eq!(server.caption.call_count(), 0);
}

#[tokio::test]
async fn test_text_file_is_invalid_format() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let form = Form::new().part(
        "image",
        image_part(b"this is not a picture".to_vec(), "notes.txt"),
    );
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid image format");
    assert_eq!(server.caption.call_count(), 0);
}

#[tokio::test]
async fn test_truncated_png_is_invalid_format() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let mut png = encoded(ImageFormat::Png);
    png.truncate(24);
    let form = Form::new().part("image", image_part(png, "broken.png"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid image format");
}

#[tokio::test]
async fn test_upload_over_limit_returns_json_413() {
    let (caption, translation) = dog_server_backends();
    let config = ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let server = TestServer::spawn_with_config(caption, translation, config).await;

    let form = Form::new().part("image", image_part(vec![0xFF; 8 * 1024], "big.jpg"));
    let resp = reqwest::Client::new()
        .post(server.url("/caption"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 413);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Image exceeds upload limit" }));
    assert_eq!(server.caption.call_count(), 0);
}

#[tokio::test]
async fn test_upload_under_limit_accepted() {
    let (caption, translation) = dog_server_backends();
    let config = ServerConfig {
        max_upload_bytes: 64 * 1024,
        ..ServerConfig::default()
    };
    let server = TestServer::spawn_with_config(caption, translation, config).await;

    let form = Form::new().part("image", image_part(encoded(ImageFormat::Jpeg), "dog.jpg"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 200);
    assert_eq!(body["caption"], "a brown dog running on the beach");
}

// =============================================================================
// SERVER ERRORS
// =============================================================================

#[tokio::test]
async fn test_inference_failure_returns_500_without_detail() {
    let server = TestServer::spawn(
        MockCaptionBackend::failing("CUDA out of memory at layer 31"),
        MockTranslationBackend::new().with_translation("hi", "unused"),
    )
    .await;

    let form = Form::new()
        .part("image", image_part(encoded(ImageFormat::Jpeg), "dog.jpg"))
        .text("language", "hi");
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 500);
    assert_eq!(body, serde_json::json!({ "error": "Caption generation failed" }));
    assert_eq!(server.translation.call_count(), 0);
}

#[tokio::test]
async fn test_blank_model_output_returns_500() {
    let server =
        TestServer::spawn(MockCaptionBackend::with_caption("</s>"), MockTranslationBackend::new())
            .await;

    let form = Form::new().part("image", image_part(encoded(ImageFormat::Png), "x.png"));
    let (status, body) = server.post_caption(form).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Caption generation failed");
}

// =============================================================================
// SYSTEM ROUTES
// =============================================================================

#[tokio::test]
async fn test_health_reports_model() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "mock-vision");
    assert_eq!(body["model_available"], true);
}

#[tokio::test]
async fn test_health_reports_unavailable_model() {
    let server = TestServer::spawn(
        MockCaptionBackend::with_caption("x").unavailable(),
        MockTranslationBackend::new(),
    )
    .await;

    let resp = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["model_available"], false);
}

#[tokio::test]
async fn test_languages_listed() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let body: Value = reqwest::get(server.url("/languages"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let codes: Vec<&str> = body["languages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["en", "hi", "te", "ta"]);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let body: Value = reqwest::get(server.url("/openapi.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["paths"]["/caption"].is_object());
    assert!(body["paths"]["/languages"].is_object());
}

#[tokio::test]
async fn test_request_id_header_generated_and_propagated() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;
    let client = reqwest::Client::new();

    let resp = client.get(server.url("/health")).send().await.unwrap();
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(uuid::Uuid::parse_str(generated).unwrap().get_version_num(), 7);

    let resp = client
        .get(server.url("/health"))
        .header("x-request-id", "client-supplied-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "client-supplied-42");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() {
    let (caption, translation) = dog_server_backends();
    let server = TestServer::spawn(caption, translation).await;

    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/caption"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}
