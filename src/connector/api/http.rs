//! JSON surface for browser front ends.
//!
//! | Method | Path          | Body             | Response                     |
//! |--------|---------------|------------------|------------------------------|
//! | GET    | `/api/state`  |                  | [`StateView`]                |
//! | GET    | `/api/models` |                  | grouped catalog              |
//! | PUT    | `/api/input`  | `{"text": ".."}` | [`StateView`]                |
//! | PUT    | `/api/model`  | `{"id": ".."}`   | [`StateView`], 422 if unknown |
//! | POST   | `/api/submit` |                  | [`SubmitView`]               |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::MarkdownRenderer;
use crate::{
    ChatSession, DomainError, ModelGroup, RequestState, SessionSnapshot, SubmitOutcome,
    SubmitRejection, Turn, TurnOutcome,
};

#[derive(Clone)]
struct AppState {
    session: ChatSession,
    renderer: Arc<dyn MarkdownRenderer>,
}

#[derive(Debug, Serialize)]
pub struct TurnView {
    pub user_text: String,
    pub bot_text: String,
    /// Bot text rendered to markup at response time.
    pub bot_html: String,
    pub outcome: TurnOutcome,
}

#[derive(Debug, Serialize)]
pub struct StateView {
    pub turns: Vec<TurnView>,
    pub selected_model: String,
    pub request_state: RequestState,
    pub input_buffer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitView {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SubmitRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<TurnView>,
    pub state: StateView,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct InputBody {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelBody {
    id: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, err: DomainError) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

fn turn_view(turn: &Turn, renderer: &dyn MarkdownRenderer) -> TurnView {
    TurnView {
        user_text: turn.user_text().to_string(),
        bot_text: turn.bot_text().to_string(),
        bot_html: renderer.render(turn.bot_text()),
        outcome: turn.outcome(),
    }
}

fn state_view(snapshot: SessionSnapshot, renderer: &dyn MarkdownRenderer) -> StateView {
    StateView {
        turns: snapshot
            .conversation
            .iter()
            .map(|turn| turn_view(turn, renderer))
            .collect(),
        selected_model: snapshot.selected_model,
        request_state: snapshot.request_state,
        input_buffer: snapshot.input_buffer,
    }
}

pub fn routes(session: ChatSession, renderer: Arc<dyn MarkdownRenderer>) -> axum::Router {
    axum::Router::new()
        .route("/api/state", get(get_state))
        .route("/api/models", get(get_models))
        .route("/api/input", put(put_input))
        .route("/api/model", put(put_model))
        .route("/api/submit", post(post_submit))
        .with_state(AppState { session, renderer })
}

pub async fn serve(
    session: ChatSession,
    renderer: Arc<dyn MarkdownRenderer>,
    addr: SocketAddr,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving chat session on http://{}", listener.local_addr()?);
    axum::serve(listener, routes(session, renderer)).await?;
    Ok(())
}

async fn get_state(State(app): State<AppState>) -> Json<StateView> {
    let snapshot = app.session.snapshot().await;
    Json(state_view(snapshot, app.renderer.as_ref()))
}

async fn get_models(State(app): State<AppState>) -> Json<Vec<ModelGroup>> {
    Json(app.session.catalog().grouped())
}

async fn put_input(
    State(app): State<AppState>,
    Json(body): Json<InputBody>,
) -> Json<StateView> {
    app.session.set_input(body.text).await;
    let snapshot = app.session.snapshot().await;
    Json(state_view(snapshot, app.renderer.as_ref()))
}

async fn put_model(
    State(app): State<AppState>,
    Json(body): Json<ModelBody>,
) -> Result<Json<StateView>, ApiError> {
    app.session
        .select_model(&body.id)
        .await
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e))?;
    let snapshot = app.session.snapshot().await;
    Ok(Json(state_view(snapshot, app.renderer.as_ref())))
}

async fn post_submit(State(app): State<AppState>) -> Result<Json<SubmitView>, ApiError> {
    let outcome = app.session.submit().await.map_err(|e| {
        warn!("Submission failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;

    let renderer = app.renderer.as_ref();
    let (accepted, reason, turn) = match outcome {
        SubmitOutcome::Settled(turn) => (true, None, Some(turn_view(&turn, renderer))),
        SubmitOutcome::Rejected(reason) => (false, Some(reason), None),
    };

    let snapshot = app.session.snapshot().await;
    Ok(Json(SubmitView {
        accepted,
        reason,
        turn,
        state: state_view(snapshot, renderer),
    }))
}
