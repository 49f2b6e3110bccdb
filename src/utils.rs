pub mod error;

/// Escapes the characters that would otherwise be interpreted as HTML markup.
pub fn escape_html(input: &str) -> String {
  let mut escaped = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(c),
    }
  }
  escaped
}

pub fn init_email_service(config: &crate::config::AppConfig) -> anyhow::Result<crate::email::EmailService> {
  use crate::email::EmailService;

  tracing::info!(
    "SMTP relay {}:{} ({}), mailbox {}",
    config.smtp.host,
    config.smtp.port,
    config.smtp.encryption,
    config.smtp.username
  );

  let email_service = EmailService::new(config.smtp.clone())?;
  Ok(email_service)
}
