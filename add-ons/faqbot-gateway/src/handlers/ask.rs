//! Turn handlers: the web form post and the JSON turn API.
//!
//! The conversation id ties the two utterances of a learning exchange together. A
//! request without one starts a new conversation; the id is echoed in every reply. Only
//! conversations waiting for a taught answer are kept between requests.

use crate::AppState;
use axum::{extract::State, response::Html, Form, Json};
use faqbot_core::{SessionPhase, TurnResponse};
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET / – minimal chat form.
pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskForm {
    user_question: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TurnRequest {
    text: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TurnReply {
    pub(crate) session_id: String,
    #[serde(flatten)]
    pub(crate) response: TurnResponse,
}

/// POST /ask – form field `user_question` (and optional `session_id`).
pub(crate) async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Json<TurnReply> {
    Json(run_turn(&state, form.session_id, &form.user_question))
}

/// POST /v1/turn – `{ "text": "...", "session_id": "..." }`.
pub(crate) async fn turn(State(state): State<AppState>, Json(req): Json<TurnRequest>) -> Json<TurnReply> {
    Json(run_turn(&state, req.session_id, &req.text))
}

/// Runs one turn for the given conversation.
///
/// The chatbot lock is held for the whole turn, so lookups and knowledge-base saves
/// from concurrent conversations never interleave.
pub(crate) fn run_turn(state: &AppState, session_id: Option<String>, text: &str) -> TurnReply {
    let session_id = session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut bot = state.bot.lock().unwrap_or_else(PoisonError::into_inner);
    let mut session = state
        .sessions
        .remove(&session_id)
        .map(|(_, session)| session)
        .unwrap_or_default();
    let response = session.submit_utterance(&mut bot, text);
    // Only a pending learning exchange needs to outlive the turn.
    if response.state == SessionPhase::Learning && !response.ended {
        state.sessions.insert(session_id.clone(), session);
    }
    drop(bot);

    tracing::debug!(
        target: "faqbot::gateway",
        session_id = %session_id,
        state = ?response.state,
        ended = response.ended,
        "Turn completed"
    );
    TurnReply { session_id, response }
}
