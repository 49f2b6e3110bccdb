use axum::{
  body::Bytes,
  extract::State,
  response::Json as JsonResponse,
  routing::{post, Router},
};

use super::model::{EmailRequest, SendEmailResponse};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn relay_routes() -> Router<SharedAppState> {
  Router::new().route(
    "/send-email",
    post(send_email_handler).fallback(method_not_allowed_handler),
  )
}

/// The body is decoded from raw bytes so clients that omit `Content-Type` still work.
pub async fn send_email_handler(
  State(state): State<SharedAppState>,
  body: Bytes,
) -> Result<JsonResponse<SendEmailResponse>, AppError> {
  let payload: EmailRequest = serde_json::from_slice(&body)?;

  let response = state.send_email(payload).await?;

  Ok(JsonResponse(response))
}

pub async fn method_not_allowed_handler() -> AppError {
  AppError::method_not_allowed("Method not allowed")
}
