use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{Method, Request, StatusCode},
  Router,
};
use http_body_util::BodyExt;
use serde::Serialize;
use tokio::{
  io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
  net::{TcpListener, TcpStream},
  task::JoinHandle,
};
use tower::ServiceExt;

use crate::{
  app::create_app,
  email::{EmailMessage, Encryption, MailError, Mailer, SmtpConfig},
  state::SharedAppState,
};

pub const MAILBOX: &str = "relay@example.com";

/// In-memory mailer that records what it was asked to send.
#[derive(Clone, Default)]
pub struct RecordingMailer {
  pub sent: Arc<Mutex<Vec<EmailMessage>>>,
  pub fail_with: Option<fn() -> MailError>,
}

impl RecordingMailer {
  pub fn failing(fail_with: fn() -> MailError) -> Self {
    Self {
      fail_with: Some(fail_with),
      ..Self::default()
    }
  }

  pub fn sent(&self) -> Vec<EmailMessage> {
    self.sent.lock().expect("mailer lock").clone()
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
    if let Some(fail_with) = self.fail_with {
      return Err(fail_with());
    }
    self.sent.lock().expect("mailer lock").push(message.clone());
    Ok(())
  }
}

pub fn app_with_mailer(mailer: RecordingMailer) -> Router {
  let state = SharedAppState::with_mailer(mailer, MAILBOX.to_string());
  create_app(state)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(body)
    .expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = response.into_body().collect().await.expect("read response body").to_bytes();
  (status, body)
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let body = Body::from(serde_json::to_vec(body).expect("serialize request body"));
  send(app, Method::POST, uri, body).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpBehavior {
  Accept,
  /// Goes silent once the client sends `MAIL FROM`.
  StallOnMailFrom,
  /// Accepts the message but never answers `QUIT`.
  StallOnQuit,
}

/// Minimal plaintext SMTP server: EHLO, AUTH LOGIN/PLAIN, MAIL, RCPT, DATA, QUIT.
pub struct FakeSmtpServer {
  pub port: u16,
  messages: Arc<Mutex<Vec<String>>>,
  handle: JoinHandle<()>,
}

impl FakeSmtpServer {
  pub async fn start(behavior: SmtpBehavior) -> Self {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake smtp");
    let port = listener.local_addr().expect("fake smtp addr").port();
    let messages = Arc::new(Mutex::new(Vec::new()));

    let received = messages.clone();
    let handle = tokio::spawn(async move {
      while let Ok((socket, _)) = listener.accept().await {
        let received = received.clone();
        tokio::spawn(async move {
          let _ = serve_session(socket, behavior, received).await;
        });
      }
    });

    Self { port, messages, handle }
  }

  pub fn smtp_config(&self) -> SmtpConfig {
    SmtpConfig {
      host: "127.0.0.1".to_string(),
      port: self.port,
      username: MAILBOX.to_string(),
      password: "test_password".to_string(),
      encryption: Encryption::None,
      connect_timeout: Duration::from_millis(500),
      send_timeout: Duration::from_millis(300),
      ..SmtpConfig::default()
    }
  }

  /// Raw DATA payloads received so far.
  pub fn messages(&self) -> Vec<String> {
    self.messages.lock().expect("fake smtp lock").clone()
  }
}

impl Drop for FakeSmtpServer {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

async fn serve_session(
  socket: TcpStream,
  behavior: SmtpBehavior,
  received: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
  let (reader, mut writer) = socket.into_split();
  let mut lines = BufReader::new(reader).lines();

  writer.write_all(b"220 localhost ESMTP\r\n").await?;

  while let Some(line) = lines.next_line().await? {
    let command = line.to_ascii_uppercase();

    if command.starts_with("EHLO") || command.starts_with("HELO") {
      writer
        .write_all(b"250-localhost\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n")
        .await?;
    } else if command.starts_with("AUTH LOGIN") {
      writer.write_all(b"334 VXNlcm5hbWU6\r\n").await?;
      lines.next_line().await?;
      writer.write_all(b"334 UGFzc3dvcmQ6\r\n").await?;
      lines.next_line().await?;
      writer.write_all(b"235 2.7.0 Authentication successful\r\n").await?;
    } else if command.starts_with("AUTH PLAIN") {
      writer.write_all(b"235 2.7.0 Authentication successful\r\n").await?;
    } else if command.starts_with("MAIL FROM") {
      if behavior == SmtpBehavior::StallOnMailFrom {
        std::future::pending::<()>().await;
      }
      writer.write_all(b"250 2.1.0 OK\r\n").await?;
    } else if command.starts_with("RCPT TO") {
      writer.write_all(b"250 2.1.5 OK\r\n").await?;
    } else if command == "DATA" {
      writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await?;
      let mut data = Vec::new();
      while let Some(data_line) = lines.next_line().await? {
        if data_line == "." {
          break;
        }
        data.push(data_line);
      }
      received.lock().expect("fake smtp lock").push(data.join("\n"));
      writer.write_all(b"250 2.0.0 OK queued\r\n").await?;
    } else if command == "QUIT" {
      if behavior == SmtpBehavior::StallOnQuit {
        std::future::pending::<()>().await;
      }
      writer.write_all(b"221 2.0.0 Bye\r\n").await?;
      return Ok(());
    } else {
      writer.write_all(b"502 5.5.2 Command not recognized\r\n").await?;
    }
  }

  Ok(())
}
