use std::{error::Error, fmt, future::Future};

use async_trait::async_trait;
use lettre::{
  message::{header::ContentType, Mailbox},
  transport::smtp::{
    authentication::Credentials,
    client::{AsyncSmtpConnection, TlsParameters},
    extension::ClientId,
  },
  Message,
};
use tokio::time::timeout;

use crate::email::types::{EmailBody, EmailMessage, Encryption, SmtpConfig};

#[derive(Debug)]
pub enum MailError {
  /// TCP connect, TLS negotiation or authentication failed or timed out.
  Connection(String),
  /// The server rejected or did not accept the message in time.
  Send(String),
  Build(String),
}

impl Error for MailError {}

impl fmt::Display for MailError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MailError::Connection(msg) => write!(f, "Connection Error: {}", msg),
      MailError::Send(msg) => write!(f, "Send Error: {}", msg),
      MailError::Build(msg) => write!(f, "Build Error: {}", msg),
    }
  }
}

/// Connect, compose and send one message.
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

pub struct EmailService {
  smtp_config: SmtpConfig,
  from: Mailbox,
  credentials: Credentials,
}

impl EmailService {
  pub fn new(smtp_config: SmtpConfig) -> anyhow::Result<Self> {
    let from: Mailbox = smtp_config
      .username
      .parse()
      .map_err(|e| anyhow::anyhow!("invalid sender address '{}': {}", smtp_config.username, e))?;
    let credentials = Credentials::new(smtp_config.username.clone(), smtp_config.password.clone());

    Ok(EmailService {
      smtp_config,
      from,
      credentials,
    })
  }

  pub fn build_message(&self, message: &EmailMessage) -> Result<Message, MailError> {
    let mut builder = Message::builder().from(self.from.clone());

    for recipient in &message.to {
      let mailbox: Mailbox = recipient
        .parse()
        .map_err(|e| MailError::Build(format!("invalid recipient '{}': {}", recipient, e)))?;
      builder = builder.to(mailbox);
    }

    let content_type = match message.body {
      EmailBody::Text(_) => ContentType::TEXT_PLAIN,
      EmailBody::Html(_) => ContentType::TEXT_HTML,
    };

    builder
      .subject(&message.subject)
      .header(content_type)
      .body(message.body.content().to_string())
      .map_err(|e| MailError::Build(e.to_string()))
  }

  async fn connect(&self) -> Result<AsyncSmtpConnection, MailError> {
    let config = &self.smtp_config;
    let hello = ClientId::default();
    let tls_parameters = || {
      TlsParameters::new(config.host.clone()).map_err(|e| MailError::Connection(format!("TLS setup failed: {}", e)))
    };

    let wrapped = match config.encryption {
      Encryption::SslTls => Some(tls_parameters()?),
      Encryption::None | Encryption::StartTls => None,
    };

    let mut connection = AsyncSmtpConnection::connect_tokio1(
      (config.host.as_str(), config.port),
      Some(config.connect_timeout),
      &hello,
      wrapped,
      None,
    )
    .await
    .map_err(|e| MailError::Connection(e.to_string()))?;

    if config.encryption == Encryption::StartTls {
      connection
        .starttls(tls_parameters()?, &hello)
        .await
        .map_err(|e| MailError::Connection(e.to_string()))?;
    }

    connection
      .auth(config.auth.mechanisms(), &self.credentials)
      .await
      .map_err(|e| MailError::Connection(format!("authentication failed: {}", e)))?;

    Ok(connection)
  }
}

async fn bounded<T, F>(limit: std::time::Duration, stage: &str, fut: F) -> Result<T, String>
where
  F: Future<Output = Result<T, MailError>>,
{
  match timeout(limit, fut).await {
    Ok(result) => result.map_err(|e| match e {
      MailError::Connection(msg) | MailError::Send(msg) | MailError::Build(msg) => msg,
    }),
    Err(_) => Err(format!("{} timed out after {:?}", stage, limit)),
  }
}

#[async_trait]
impl Mailer for EmailService {
  async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
    let email = self.build_message(message)?;
    let config = &self.smtp_config;

    tracing::debug!(
      "Connecting to {}:{} ({})",
      config.host,
      config.port,
      config.encryption
    );

    let mut connection = bounded(config.connect_timeout, "connect", self.connect())
      .await
      .map_err(MailError::Connection)?;

    let sent = bounded(config.send_timeout, "send", async {
      connection
        .send(email.envelope(), &email.formatted())
        .await
        .map_err(|e| MailError::Send(e.to_string()))
    })
    .await;

    // A failed transaction leaves the session in an unknown state; drop it without QUIT.
    if let Err(e) = sent {
      return Err(MailError::Send(e));
    }

    let quit = bounded(config.send_timeout, "quit", async {
      connection.quit().await.map_err(|e| MailError::Send(e.to_string()))
    })
    .await;
    if let Err(e) = quit {
      tracing::debug!("SMTP QUIT failed: {}", e);
    }

    Ok(())
  }
}
