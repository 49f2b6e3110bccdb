use std::{fmt, str::FromStr, time::Duration};

use lettre::transport::smtp::authentication::Mechanism;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
  None,
  StartTls,
  /// Implicit TLS from the first byte (SMTPS, usually port 465).
  SslTls,
}

impl FromStr for Encryption {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "none" => Ok(Encryption::None),
      "starttls" => Ok(Encryption::StartTls),
      "ssl" | "tls" | "ssltls" | "ssl/tls" => Ok(Encryption::SslTls),
      other => Err(format!("unknown encryption mode '{}'", other)),
    }
  }
}

impl fmt::Display for Encryption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Encryption::None => write!(f, "none"),
      Encryption::StartTls => write!(f, "starttls"),
      Encryption::SslTls => write!(f, "ssl/tls"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
  Login,
  Plain,
  /// Let the server pick between PLAIN and LOGIN.
  Auto,
}

impl AuthMode {
  pub fn mechanisms(&self) -> &'static [Mechanism] {
    match self {
      AuthMode::Login => &[Mechanism::Login],
      AuthMode::Plain => &[Mechanism::Plain],
      AuthMode::Auto => &[Mechanism::Plain, Mechanism::Login],
    }
  }
}

impl FromStr for AuthMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "login" => Ok(AuthMode::Login),
      "plain" => Ok(AuthMode::Plain),
      "auto" => Ok(AuthMode::Auto),
      other => Err(format!("unknown auth mode '{}'", other)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  pub username: String,
  pub password: String,
  pub encryption: Encryption,
  pub auth: AuthMode,
  pub connect_timeout: Duration,
  pub send_timeout: Duration,
}

impl Default for SmtpConfig {
  fn default() -> Self {
    SmtpConfig {
      host: "smtp-mail.outlook.com".to_string(),
      port: 587,
      username: "".to_string(),
      password: "".to_string(),
      encryption: Encryption::StartTls,
      auth: AuthMode::Login,
      connect_timeout: Duration::from_secs(10),
      send_timeout: Duration::from_secs(10),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailBody {
  Text(String),
  Html(String),
}

impl EmailBody {
  pub fn content(&self) -> &str {
    match self {
      EmailBody::Text(text) | EmailBody::Html(text) => text,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
  pub to: Vec<String>,
  pub subject: String,
  pub body: EmailBody,
}

impl EmailMessage {
  pub fn new(to: Vec<String>, subject: String, body: EmailBody) -> Self {
    EmailMessage { to, subject, body }
  }
}
