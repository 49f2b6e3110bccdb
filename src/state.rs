use std::sync::Arc;

use crate::{
  domains::relay::{
    model::{EmailRequest, SendEmailResponse},
    service::{RelayService, RelayServiceError, RelayServiceImpl},
  },
  email::{EmailService, Mailer},
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_email(
    &self,
    req: EmailRequest,
  ) -> impl std::future::Future<Output = Result<SendEmailResponse, RelayServiceError>> + Send;
}

/// Read-only handle shared by every request; holds no mutable state.
#[derive(Clone)]
pub struct SharedAppState {
  pub relay_service: Arc<dyn RelayService>,
}

impl SharedAppState {
  pub fn new(email_service: EmailService, mailbox: String) -> Self {
    Self::with_mailer(email_service, mailbox)
  }

  pub fn with_mailer<M>(mailer: M, mailbox: String) -> Self
  where
    M: Mailer + 'static,
  {
    let relay_service = Arc::new(RelayServiceImpl::new(mailer, mailbox));

    Self { relay_service }
  }
}

impl AppState for SharedAppState {
  async fn send_email(&self, req: EmailRequest) -> Result<SendEmailResponse, RelayServiceError> {
    self.relay_service.send_email(req).await
  }
}
