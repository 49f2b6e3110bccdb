use async_trait::async_trait;
use std::error::Error;

use super::model::{EmailRequest, SendEmailResponse};
use crate::{
  email::{EmailBody, EmailMessage, MailError, Mailer},
  utils::escape_html,
};

#[derive(Debug)]
pub enum RelayServiceError {
  Connection(String),
  Send(String),
}

impl Error for RelayServiceError {}

impl std::fmt::Display for RelayServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RelayServiceError::Connection(msg) => write!(f, "Connection Error: {}", msg),
      RelayServiceError::Send(msg) => write!(f, "Send Error: {}", msg),
    }
  }
}

impl From<MailError> for RelayServiceError {
  fn from(err: MailError) -> Self {
    match err {
      MailError::Connection(msg) => RelayServiceError::Connection(msg),
      MailError::Send(msg) | MailError::Build(msg) => RelayServiceError::Send(msg),
    }
  }
}

#[async_trait]
pub trait RelayService: Send + Sync {
  async fn send_email(&self, req: EmailRequest) -> Result<SendEmailResponse, RelayServiceError>;
}

pub struct RelayServiceImpl<M> {
  mailer: M,
  mailbox: String,
}

impl<M> RelayServiceImpl<M>
where
  M: Mailer,
{
  /// `mailbox` receives every relayed message.
  pub fn new(mailer: M, mailbox: String) -> Self {
    Self { mailer, mailbox }
  }

  pub fn compose(&self, req: &EmailRequest) -> EmailMessage {
    let html = format!(
      "Name: {}<br>Message: {}",
      escape_html(&req.name),
      escape_html(&req.body)
    );

    EmailMessage::new(vec![self.mailbox.clone()], req.subject.clone(), EmailBody::Html(html))
  }
}

#[async_trait]
impl<M> RelayService for RelayServiceImpl<M>
where
  M: Mailer,
{
  async fn send_email(&self, req: EmailRequest) -> Result<SendEmailResponse, RelayServiceError> {
    let message = self.compose(&req);

    self.mailer.send(&message).await?;

    tracing::info!("Relayed message '{}' from '{}'", req.subject, req.name);

    Ok(SendEmailResponse::sent())
  }
}
