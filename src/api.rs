//! REST API Server for the financial chatbot
//!
//! Thin HTTP surface over the chat service. Authentication and chat
//! history live outside this crate.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::ChatService;
use crate::config::Settings;
use crate::models::IntentLabel;

/// =============================
/// Request / Response Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MessageRequest {
    pub text: String,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatResponse {
    pub response: String,
    pub intent: IntentLabel,
    pub confidence: f64,
    pub data: Option<Value>,
    pub request_id: Uuid,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub chat: Arc<ChatService>,
}

/// =============================
/// Info Endpoints
/// =============================

async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Welcome to the AI Financial Chatbot API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "classifier_state": state.chat.classifier().state(),
        "tokenizer": state.chat.classifier().analyzer().backend().name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn process_message(
    State(state): State<ApiState>,
    Json(req): Json<MessageRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, chars = req.text.len(), "Received chat message");

    let context = req.context.unwrap_or_else(|| serde_json::json!({}));
    let reply = state.chat.process_message(&req.text, &context).await;

    (
        StatusCode::OK,
        Json(ChatResponse {
            response: reply.response,
            intent: reply.intent,
            confidence: reply.confidence,
            data: reply.data,
            request_id,
        }),
    )
}

/// =============================
/// Router
/// =============================

fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(chat: Arc<ChatService>, settings: &Settings) -> Router {
    let state = ApiState { chat };
    let chat_path = format!("{}/chat/message", settings.api_prefix);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(&chat_path, post(process_message))
        .with_state(state)
        .layer(cors_layer(settings))
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    chat: Arc<ChatService>,
    settings: &Settings,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(chat, settings);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", settings.port);
    info!("Chat endpoint: POST {}/chat/message", settings.api_prefix);

    axum::serve(listener, router).await?;

    Ok(())
}
