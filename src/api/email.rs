use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    routing::post,
    Router,
};

use crate::error::{RelayError, Result};
use crate::relay::SUCCESS_MESSAGE;
use crate::state::AppState;

/// Email routes
pub fn email_routes() -> Router<AppState> {
    // Bodies of any size reach the relay and get a relay message back.
    Router::new().route(
        "/email",
        post(send_email).layer(DefaultBodyLimit::disable()),
    )
}

/// POST /email - Validate, convert and forward an email to the active provider
async fn send_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str> {
    if !is_json(&headers) {
        return Err(RelayError::NotJsonObject);
    }

    state.relay.handle(&body).await?;
    Ok(SUCCESS_MESSAGE)
}

/// `application/json` or any `application/*+json` media type.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
