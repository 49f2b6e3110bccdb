use std::{env, fmt, str::FromStr, time::Duration};

use crate::email::{AuthMode, Encryption, SmtpConfig};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum ConfigError {
  MissingVar(&'static str),
  Invalid { key: &'static str, value: String },
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingVar(key) => write!(f, "{} environment variable must be set.", key),
      ConfigError::Invalid { key, value } => write!(f, "invalid value '{}' for {}", value, key),
    }
  }
}

/// Known SMTP endpoints. Individual `SMTP_*` variables override the preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpProvider {
  Outlook,
  Gmail,
}

impl SmtpProvider {
  fn preset(self) -> (&'static str, u16, Encryption) {
    match self {
      SmtpProvider::Outlook => ("smtp-mail.outlook.com", 587, Encryption::StartTls),
      SmtpProvider::Gmail => ("smtp.gmail.com", 465, Encryption::SslTls),
    }
  }
}

impl FromStr for SmtpProvider {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "outlook" => Ok(SmtpProvider::Outlook),
      "gmail" => Ok(SmtpProvider::Gmail),
      _ => Err(()),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub port: u16,
  pub smtp: SmtpConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let required = |key: &'static str| match lookup(key) {
      Some(value) if !value.trim().is_empty() => Ok(value),
      _ => Err(ConfigError::MissingVar(key)),
    };

    let username = required("USERNAME_")?;
    let password = required("PASSWORD_")?;

    let provider = parse_or(&lookup, "SMTP_PROVIDER", SmtpProvider::Outlook)?;
    let (host, port, encryption) = provider.preset();

    let smtp = SmtpConfig {
      host: lookup("SMTP_HOST")
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| host.to_string()),
      port: parse_or(&lookup, "SMTP_PORT", port)?,
      username,
      password,
      encryption: parse_or(&lookup, "SMTP_ENCRYPTION", encryption)?,
      auth: parse_or(&lookup, "SMTP_AUTH", AuthMode::Login)?,
      connect_timeout: timeout_secs(&lookup, "SMTP_CONNECT_TIMEOUT_SECS")?,
      send_timeout: timeout_secs(&lookup, "SMTP_SEND_TIMEOUT_SECS")?,
    };

    Ok(AppConfig {
      port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
      smtp,
    })
  }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
{
  match lookup(key) {
    Some(value) if !value.trim().is_empty() => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { key, value }),
    _ => Ok(default),
  }
}

/// Timeouts must be positive; zero would fail every request.
fn timeout_secs<F>(lookup: &F, key: &'static str) -> Result<Duration, ConfigError>
where
  F: Fn(&str) -> Option<String>,
{
  match parse_or(lookup, key, DEFAULT_TIMEOUT_SECS)? {
    0 => Err(ConfigError::Invalid {
      key,
      value: "0".to_string(),
    }),
    secs => Ok(Duration::from_secs(secs)),
  }
}
