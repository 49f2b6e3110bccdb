use serde::{Deserialize, Serialize};

/// Inbound payload of `POST /send-email`. Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailRequest {
  pub name: String,
  pub subject: String,
  pub body: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendEmailResponse {
  pub message: String,
}

impl SendEmailResponse {
  pub fn sent() -> Self {
    Self {
      message: "Email sent successfully".to_string(),
    }
  }
}
