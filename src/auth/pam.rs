//! PAM provider using the terminal conversation.

use super::{AuthHandle, AuthProvider, AuthStatus};
use crate::{Error, Result};
use pam_client::{conv_cli::Conversation, Context, Flag};
use tracing::debug;

pub const DEFAULT_SERVICE: &str = "vtlock";

#[derive(Debug, Clone)]
pub struct Pam {
    service: String,
}

impl Pam {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Default for Pam {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

pub struct PamHandle {
    context: Context<Conversation>,
}

impl AuthProvider for Pam {
    type Handle = PamHandle;

    fn open(&self, user: &str) -> Result<PamHandle> {
        let context = Context::new(&self.service, Some(user), Conversation::new()).map_err(
            |e| Error::AuthContext {
                user: user.to_string(),
                reason: e.to_string(),
            },
        )?;

        debug!(service = %self.service, user, "pam context started");

        Ok(PamHandle { context })
    }
}

fn status(result: pam_client::Result<()>) -> AuthStatus {
    match result {
        Ok(()) => AuthStatus::Success,
        Err(e) => {
            debug!("pam: {e}");
            AuthStatus::Failed(e.code() as i32)
        }
    }
}

impl AuthHandle for PamHandle {
    fn verify_credentials(&mut self) -> AuthStatus {
        status(self.context.authenticate(Flag::NONE))
    }

    fn check_account(&mut self) -> AuthStatus {
        status(self.context.acct_mgmt(Flag::NONE))
    }

    fn close(self, last_status: AuthStatus) {
        // `Context` passes its own record of the last PAM return value to
        // `pam_end` when dropped; it always matches `last_status`.
        debug!(%last_status, "pam_end");
        drop(self.context);
    }
}
