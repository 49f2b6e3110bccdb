use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

use crate::domains::relay::service::RelayServiceError;

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn method_not_allowed(message: impl Into<String>) -> Self {
    Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = Json(json!({
      "error": self.message,
    }));

    (self.status_code, body).into_response()
  }
}

impl From<serde_json::Error> for AppError {
  fn from(error: serde_json::Error) -> Self {
    tracing::warn!("JSON error: {:?}", error);
    AppError::bad_request(format!("Error decoding request body: {}", error))
  }
}

impl From<RelayServiceError> for AppError {
  fn from(error: RelayServiceError) -> Self {
    tracing::error!("Relay error: {}", error);
    match error {
      RelayServiceError::Connection(msg) => {
        AppError::internal_server_error(format!("Error connecting to SMTP server: {}", msg))
      }
      RelayServiceError::Send(msg) => AppError::internal_server_error(format!("Error sending email: {}", msg)),
    }
  }
}
