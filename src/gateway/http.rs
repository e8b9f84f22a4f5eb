//! HTTP routes for the browser client.
//!
//! | Route               | Handler            |
//! |---------------------|--------------------|
//! | `GET /messages`     | long-poll fetch    |
//! | `POST /post`        | post a message     |
//! | `GET /`, `/main.js`, `/style.css` | static page files |
//!
//! Anything else is a JSON 404.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{ChatError, MessageView, Result, ServerConfig, Token};
use crate::room::ChatRoom;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub room: ChatRoom,
    pub page_dir: Arc<PathBuf>,
}

impl GatewayState {
    #[must_use]
    pub fn new(room: ChatRoom, page_dir: impl Into<PathBuf>) -> Self {
        Self {
            room,
            page_dir: Arc::new(page_dir.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FetchParams {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub token: String,
    pub body: String,
}

/// Reply to a post: `{"sequence": n}`, the log index of the new message.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PostAck {
    pub sequence: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::UnknownToken => StatusCode::BAD_REQUEST,
            ChatError::Config { .. } | ChatError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Build the router over `state`.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/messages", get(fetch_messages))
        .route("/post", post(post_message))
        .route("/", get(index_html))
        .route("/main.js", get(main_js))
        .route("/style.css", get(style_css))
        .fallback(not_found)
        .with_state(state)
}

/// Bind and serve until the listener fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let room = ChatRoom::from_config(&config);
    let app = router(GatewayState::new(room, config.page_dir.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        poll_timeout_secs = config.poll_timeout_secs,
        "ng-chat listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn fetch_messages(
    State(state): State<GatewayState>,
    Query(params): Query<FetchParams>,
) -> Result<Json<Vec<MessageView>>> {
    let feed = state.room.fetch(&Token::new(params.token)).await?;
    Ok(Json(feed))
}

pub async fn post_message(
    State(state): State<GatewayState>,
    Json(request): Json<PostRequest>,
) -> Result<Json<PostAck>> {
    let sequence = state.room.post(&Token::new(request.token), request.body)?;
    Ok(Json(PostAck { sequence }))
}

async fn index_html(State(state): State<GatewayState>) -> Response {
    serve_page(&state.page_dir, "index.html", "text/html").await
}

async fn main_js(State(state): State<GatewayState>) -> Response {
    serve_page(&state.page_dir, "main.js", "text/javascript").await
}

async fn style_css(State(state): State<GatewayState>) -> Response {
    serve_page(&state.page_dir, "style.css", "text/css").await
}

async fn serve_page(dir: &Path, name: &str, content_type: &'static str) -> Response {
    match tokio::fs::read(dir.join(name)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(err) => {
            warn!(file = name, error = %err, "page file unavailable");
            not_found().await.into_response()
        }
    }
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_string(),
        }),
    )
}
