//! Outbound SMTP delivery
//!
//! This module opens one SMTP session per message using lettre's async
//! connection API: connect (plain, STARTTLS or implicit TLS), authenticate,
//! transmit, quit. Connect and send are bounded by separate timeouts.

mod service;
mod types;

pub use service::{EmailService, MailError, Mailer};
pub use types::{AuthMode, EmailBody, EmailMessage, Encryption, SmtpConfig};
