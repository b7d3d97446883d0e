//! Follow-up chat handler.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;

use vchat_session::{CHAT_APOLOGY, NO_ANALYSIS_SENTINEL};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::{presented_session, with_session_cookie};

/// Chat request body.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub question: Option<String>,
}

/// Chat response.
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: &'static str,
}

fn ok(jar: CookieJar, response: String) -> (CookieJar, Json<ChatResponse>) {
    (
        jar,
        Json(ChatResponse {
            response,
            status: "success",
        }),
    )
}

/// Handle `POST /chat`: answer a follow-up question against the
/// session's conversation history.
pub async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<ChatRequest>,
) -> ApiResult<(CookieJar, Json<ChatResponse>)> {
    let question = body
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::validation("No question provided"))?;

    let (session_id, session) = state.sessions.get_or_create(presented_session(&jar)).await;
    let jar = with_session_cookie(jar, session_id);

    // Lock held across the gateway call: concurrent chats for one
    // session apply to history in order.
    let mut conversation = session.lock_conversation().await;

    if !conversation.has_summary() {
        return Ok(ok(jar, NO_ANALYSIS_SENTINEL.to_string()));
    }

    let history = conversation.turns().to_vec();
    match state.gateway.continue_chat(&history, &question).await {
        Ok(answer) => {
            // Question and answer land together or not at all.
            conversation.append_exchange(&question, &answer);
            Ok(ok(jar, answer))
        }
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Chat continuation failed");
            Ok(ok(jar, CHAT_APOLOGY.to_string()))
        }
    }
}
