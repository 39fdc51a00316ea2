//! Inbound message endpoint handlers.
//!
//! Pipeline: content-type check → size check → decode → route. Replies to
//! proxy-initiated requests resolve the operations map and are acknowledged
//! with an empty 200; requests run through the dispatcher and their reply is
//! encoded into the response body.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use flowgate_core::error::{ClientCode, FlowgateError, Result};
use flowgate_core::message;
use flowgate_core::protocol::CONTENT_TYPE;

use crate::app_state::AppState;

/// `PUT /` — the message exchange endpoint.
pub async fn handle_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match process_message(state, &headers, body).await {
        Ok(reply) => encoded_response(reply),
        Err(e) => error_response(e),
    }
}

/// `PUT /echo` — decode, deep-clone, re-encode. Diagnostic surface used to
/// prove round-trip fidelity over the wire.
pub async fn handle_echo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = check_exchange(&state, &headers, &body)
        .and_then(|_| message::deserialize(body, state.registry()))
        .and_then(|message| message::serialize(message.clone_boxed().as_ref(), false));

    match result {
        Ok(bytes) => encoded_response(bytes),
        Err(e) => error_response(e),
    }
}

async fn process_message(state: AppState, headers: &HeaderMap, body: Bytes) -> Result<Vec<u8>> {
    check_exchange(&state, headers, &body)?;

    let message = message::deserialize(body, state.registry())?;
    let type_code = message.type_code();
    let request_id = message.request_id();
    tracing::debug!(type_code, request_id, "message received");

    if message.is_reply() {
        // Resolve the pending proxy-initiated operation. An unknown id is a
        // peer/proxy desync worth reporting, not a failure of this exchange.
        if !state.operations().complete(request_id, message) {
            tracing::warn!(request_id, "reply for unknown request id");
        }
        return Ok(Vec::new());
    }

    let reply = state.dispatcher().dispatch(state.clone(), message).await?;
    message::serialize(reply.as_ref(), false)
}

fn check_exchange(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Result<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type != CONTENT_TYPE {
        return Err(FlowgateError::Protocol(format!(
            "incorrect content type {content_type:?}, must be {CONTENT_TYPE}"
        )));
    }

    let max = state.cfg().proxy.max_message_bytes;
    if body.len() > max {
        return Err(FlowgateError::Protocol(format!(
            "message body of {} bytes exceeds limit of {max}",
            body.len()
        )));
    }
    Ok(())
}

fn encoded_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        body,
    )
        .into_response()
}

fn error_response(err: FlowgateError) -> Response {
    let code = err.client_code();
    let status = match code {
        ClientCode::Protocol | ClientCode::UnknownType | ClientCode::Correlation => {
            StatusCode::BAD_REQUEST
        }
        ClientCode::Engine | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(code = code.as_str(), error = %err, "exchange failed");

    let body = json!({
        "code": code.as_str(),
        "msg": err.to_string(),
    })
    .to_string();
    (status, body).into_response()
}
