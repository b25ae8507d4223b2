//! Remote provider HTTP contract tests
//!
//! An in-process axum server stands in for both completion services and
//! records what each request looked like.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shakmaty::Color;

use llmchess::game::ai::http::build_client;
use llmchess::game::ai::{
    ChatCompletionsProvider, GeminiProvider, MoveProvider, MoveRequest, ProviderError,
};

const GEMINI_PATH: &str = "/v1beta/models/test-model/generateContent";
const CHAT_PATH: &str = "/v1/chat/completions";

/// One request as the fake service saw it
#[derive(Debug, Clone)]
struct Seen {
    query: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeService {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeService {
    fn new(status: StatusCode, reply: Value) -> Self {
        Self {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn last(&self) -> Seen {
        self.seen.lock().last().cloned().unwrap()
    }
}

async fn handle(
    State(service): State<FakeService>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    service.seen.lock().push(Seen {
        query,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (service.status, Json(service.reply.clone()))
}

/// Serve `service` on an ephemeral port; returns the base URL
async fn serve(service: FakeService) -> String {
    let app = Router::new()
        .route(GEMINI_PATH, post(handle))
        .route(CHAT_PATH, post(handle))
        .with_state(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).unwrap()
}

fn gemini(base: &str, key: Option<&str>) -> GeminiProvider {
    GeminiProvider::new(
        client(),
        "Gemini",
        format!("{}{}", base, GEMINI_PATH),
        0.5,
        key.map(str::to_string),
        "GEMINI_API_KEY",
    )
}

fn chat(base: &str) -> ChatCompletionsProvider {
    ChatCompletionsProvider::new(
        client(),
        "Llama 3.3",
        format!("{}{}", base, CHAT_PATH),
        "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free",
        0.0,
        250,
        Some(String::from("secret-token")),
        "TOGETHER_API_KEY",
    )
}

fn request(side: Color, ply: usize) -> MoveRequest {
    MoveRequest {
        side,
        pgn: if ply == 0 { String::new() } else { String::from("1. e4") },
        fen: String::from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"),
        legal_moves: vec![String::from("e5"), String::from("c5"), String::from("Nf6")],
        ply,
    }
}

fn gemini_reply(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

fn chat_reply(text: &str) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn test_gemini_success() {
    //! Key in the query string, prompt in contents, temperature in generationConfig
    let service = FakeService::new(
        StatusCode::OK,
        gemini_reply("1. Open game.\n2. Threats: none.\nBest Move: e5."),
    );
    let base = serve(service.clone()).await;

    let mv = gemini(&base, Some("test-key"))
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap();
    assert_eq!(mv, "e5");

    let seen = service.last();
    assert_eq!(seen.query.as_deref(), Some("key=test-key"));
    assert_eq!(seen.authorization, None);
    assert_eq!(seen.body["generationConfig"]["temperature"], json!(0.5));
    let prompt = seen.body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("It is Black's turn to move."));
    assert!(prompt.contains("- Legal Moves for Black: [e5, c5, Nf6]"));
}

#[tokio::test]
async fn test_gemini_server_error_is_status() {
    let service = FakeService::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "overloaded" }),
    );
    let base = serve(service).await;

    let err = gemini(&base, Some("test-key"))
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap_err();
    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_gemini_without_candidates() {
    let service = FakeService::new(StatusCode::OK, json!({ "candidates": [] }));
    let base = serve(service).await;

    let err = gemini(&base, Some("test-key"))
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::MissingField { .. }));
}

#[tokio::test]
async fn test_gemini_without_key_sends_nothing() {
    let service = FakeService::new(StatusCode::OK, gemini_reply("Best Move: e5"));
    let base = serve(service.clone()).await;

    let err = gemini(&base, None)
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey { .. }));
    assert!(service.seen.lock().is_empty());
}

// ============================================================================
// Chat completions
// ============================================================================

#[tokio::test]
async fn test_chat_first_move_request_shape() {
    //! Bearer auth, system + user messages, opening prompt variant
    let service = FakeService::new(
        StatusCode::OK,
        chat_reply("Control the centre.\nBest Move: e4"),
    );
    let base = serve(service.clone()).await;

    let mv = chat(&base)
        .get_move(&request(Color::White, 0))
        .await
        .unwrap();
    assert_eq!(mv, "e4");

    let seen = service.last();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer secret-token"));
    assert_eq!(seen.query, None);
    assert_eq!(
        seen.body["model"],
        json!("meta-llama/Llama-3.3-70B-Instruct-Turbo-Free")
    );
    assert_eq!(seen.body["max_tokens"], json!(250));
    assert_eq!(seen.body["temperature"], json!(0.0));
    assert_eq!(seen.body["messages"][0]["role"], json!("system"));
    assert_eq!(seen.body["messages"][1]["role"], json!("user"));

    let user = seen.body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("first move of the game"));
    assert!(!user.contains("four steps"));
}

#[tokio::test]
async fn test_chat_later_move_uses_four_steps() {
    let service = FakeService::new(StatusCode::OK, chat_reply("Best Move: Nf6"));
    let base = serve(service.clone()).await;

    chat(&base)
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap();

    let user = service.last().body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(user.contains("four steps"));
    assert!(user.contains("- Game History (PGN): \"1. e4\""));
}

#[tokio::test]
async fn test_chat_fallback_to_last_line() {
    let service = FakeService::new(StatusCode::OK, chat_reply("I will play\nc5."));
    let base = serve(service).await;

    let mv = chat(&base)
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap();
    assert_eq!(mv, "c5");
}

#[tokio::test]
async fn test_chat_without_choices() {
    let service = FakeService::new(StatusCode::OK, json!({ "id": "x" }));
    let base = serve(service).await;

    let err = chat(&base)
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::MissingField {
            field: "/choices/0/message/content"
        }
    ));
}

#[tokio::test]
async fn test_chat_empty_content_is_rejected() {
    let service = FakeService::new(StatusCode::OK, chat_reply("   "));
    let base = serve(service).await;

    let err = chat(&base)
        .get_move(&request(Color::Black, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::EmptyReply { .. }));
}
