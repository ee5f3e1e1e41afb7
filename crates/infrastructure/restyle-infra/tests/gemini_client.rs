use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use restyle_config::ApiConfig;
use restyle_core::{EncodedImage, MediaType, PromptKind, RestyleError};
use restyle_infra::GeminiClient;

type Reply = Arc<dyn Fn(&str, &Value) -> (StatusCode, Value) + Send + Sync>;

#[derive(Debug, Clone)]
struct Seen {
    call: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Mock {
    seen: Arc<Mutex<Vec<Seen>>>,
    reply: Reply,
}

async fn generate(
    State(mock): State<Mock>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let (status, reply) = (mock.reply)(&call, &body);
    mock.seen.lock().unwrap().push(Seen {
        call,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (status, Json(reply))
}

async fn start_mock(
    reply: impl Fn(&str, &Value) -> (StatusCode, Value) + Send + Sync + 'static,
) -> (SocketAddr, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mock = Mock {
        seen: seen.clone(),
        reply: Arc::new(reply),
    };
    let app = Router::new()
        .route("/v1beta/models/:call", post(generate))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn client_for(addr: SocketAddr) -> GeminiClient {
    // No trailing slash on purpose: the client must still append.
    let cfg = ApiConfig::new("test-key").with_base_url(format!("http://{addr}/v1beta"));
    GeminiClient::from_config(&cfg).unwrap()
}

fn png(seed: u8) -> EncodedImage {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend(std::iter::repeat(seed).take(48));
    EncodedImage::from_bytes(&bytes, MediaType::Png, format!("img-{seed}.png")).unwrap()
}

fn text_reply(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

fn image_reply(image: &EncodedImage) -> Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [
                    { "text": "Here is your picture." },
                    { "inlineData": { "mimeType": "image/png", "data": image.base64_payload() } }
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn derive_prompts_sends_schema_and_parses_reply() {
    let (addr, seen) = start_mock(|_, _| {
        (
            StatusCode::OK,
            text_reply(r#"{"simple":"s","detailed":"d","technical":"t"}"#),
        )
    })
    .await;
    let client = client_for(addr);
    let reference = png(1);

    let prompts = client.derive_prompts(&reference).await.unwrap();
    assert_eq!(prompts.get(PromptKind::Simple), "s");
    assert_eq!(prompts.get(PromptKind::Detailed), "d");
    assert_eq!(prompts.get(PromptKind::Technical), "t");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let req = &seen[0];
    assert_eq!(req.call, "gemini-2.5-flash:generateContent");
    assert_eq!(req.api_key.as_deref(), Some("test-key"));

    let body = &req.body;
    assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(
        body["generationConfig"]["responseSchema"]["required"],
        json!(["simple", "detailed", "technical"])
    );
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert!(parts[0]["text"].as_str().unwrap().contains("pose"));
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inlineData"]["data"], reference.base64_payload());
}

#[tokio::test]
async fn malformed_prompt_reply_is_a_derivation_error() {
    let (addr, _) = start_mock(|_, _| {
        (
            StatusCode::OK,
            text_reply(r#"{"simple":"s","detailed":""}"#),
        )
    })
    .await;

    let err = client_for(addr).derive_prompts(&png(1)).await.unwrap_err();
    assert_eq!(err, RestyleError::PromptDerivation("malformed response".into()));
    assert_eq!(
        err.to_string(),
        "Failed to generate prompts: malformed response"
    );
}

#[tokio::test]
async fn blocked_prompt_request_reports_the_reason() {
    let (addr, _) = start_mock(|_, _| {
        (
            StatusCode::OK,
            json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
        )
    })
    .await;

    let err = client_for(addr).derive_prompts(&png(1)).await.unwrap_err();
    assert_eq!(
        err,
        RestyleError::PromptDerivation("request blocked: SAFETY".into())
    );
    assert_eq!(
        err.to_string(),
        "Failed to generate prompts: request blocked: SAFETY"
    );
}

#[tokio::test]
async fn empty_prompt_reply_is_malformed() {
    let (addr, _) = start_mock(|_, _| (StatusCode::OK, json!({ "candidates": [] }))).await;

    let err = client_for(addr).derive_prompts(&png(1)).await.unwrap_err();
    assert_eq!(err, RestyleError::PromptDerivation("malformed response".into()));
}

#[tokio::test]
async fn http_errors_surface_the_service_message() {
    let (addr, _) = start_mock(|_, _| {
        (
            StatusCode::BAD_REQUEST,
            json!({ "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" } }),
        )
    })
    .await;

    let err = client_for(addr).derive_prompts(&png(1)).await.unwrap_err();
    match err {
        RestyleError::PromptDerivation(msg) => {
            assert!(msg.contains("400"), "{msg}");
            assert!(msg.contains("INVALID_ARGUMENT: API key not valid"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn synthesize_image_returns_first_inline_image() {
    let generated = png(9);
    let reply = image_reply(&generated);
    let (addr, seen) = start_mock(move |_, _| (StatusCode::OK, reply.clone())).await;
    let source = png(2);

    let image = client_for(addr)
        .synthesize_image("on a rooftop at dusk", &source)
        .await
        .unwrap();
    assert_eq!(image.decode().unwrap(), generated.decode().unwrap());
    assert_eq!(image.media_type(), MediaType::Png);
    assert_eq!(image.name(), "generated.png");

    let seen = seen.lock().unwrap();
    let body = &seen[0].body;
    assert_eq!(seen[0].call, "gemini-2.5-flash-image-preview:generateContent");
    assert_eq!(
        body["generationConfig"]["responseModalities"],
        json!(["IMAGE", "TEXT"])
    );
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts[0]["inlineData"]["data"], source.base64_payload());
    assert!(parts[1]["text"]
        .as_str()
        .unwrap()
        .ends_with("Prompt: on a rooftop at dusk"));
}

#[tokio::test]
async fn synthesize_styled_sends_style_then_source() {
    let generated = png(7);
    let reply = image_reply(&generated);
    let (addr, seen) = start_mock(move |_, _| (StatusCode::OK, reply.clone())).await;
    let (style, source) = (png(3), png(4));

    client_for(addr)
        .synthesize_styled(&style, &source)
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    let parts = seen[0].body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0]["inlineData"]["data"], style.base64_payload());
    assert_eq!(parts[1]["inlineData"]["data"], source.base64_payload());
    assert!(parts[2]["text"].is_string());
}

#[tokio::test]
async fn text_only_image_reply_is_no_image_returned() {
    let (addr, _) = start_mock(|_, _| (StatusCode::OK, text_reply("I cannot do that."))).await;

    let err = client_for(addr)
        .synthesize_image("anything", &png(2))
        .await
        .unwrap_err();
    assert_eq!(err, RestyleError::ImageSynthesis("no image returned".into()));
}

#[tokio::test]
async fn unreachable_service_is_a_synthesis_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr)
        .synthesize_image("anything", &png(2))
        .await
        .unwrap_err();
    assert!(matches!(err, RestyleError::ImageSynthesis(_)));
}
