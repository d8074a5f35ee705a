//! Authentication provider binding.
//!
//! A provider hands out one [`AuthHandle`] per resolved account. The handle
//! lives inside a [`UserInfo`], which runs the two-step check (credentials,
//! then account validity) and closes the handle exactly once when dropped.

#[cfg(feature = "pam")]
pub mod pam;

use crate::{Error, Result};
use std::fmt;
use tracing::{debug, info, warn};

/// Last status reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unset,
    Success,
    /// Provider specific status code (e.g. a `PAM_*` value).
    Failed(i32),
}

impl AuthStatus {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Success => write!(f, "success"),
            Self::Failed(code) => write!(f, "failed ({code})"),
        }
    }
}

/// An open conversation with the authentication provider.
pub trait AuthHandle {
    /// Ask for and verify the user's credentials.
    fn verify_credentials(&mut self) -> AuthStatus;

    /// Check expiry, lockout and similar account policy.
    fn check_account(&mut self) -> AuthStatus;

    /// Tear the conversation down. `last_status` is the final status recorded
    /// on the owning `UserInfo`.
    fn close(self, last_status: AuthStatus);
}

pub trait AuthProvider {
    type Handle: AuthHandle;

    /// Start a conversation bound to `user`.
    ///
    /// # Errors
    /// Returns `Error::AuthContext` if the provider cannot be started.
    fn open(&self, user: &str) -> Result<Self::Handle>;
}

impl<P: AuthProvider + ?Sized> AuthProvider for &P {
    type Handle = P::Handle;

    fn open(&self, user: &str) -> Result<Self::Handle> {
        (**self).open(user)
    }
}

/// A resolved identity together with its authentication context.
pub struct UserInfo<H: AuthHandle> {
    name: String,
    handle: Option<H>,
    status: AuthStatus,
}

impl<H: AuthHandle> UserInfo<H> {
    /// Bind `name` to a fresh provider conversation.
    ///
    /// # Errors
    /// Returns `Error::AuthContext` if the name is empty or the provider fails
    /// to start. Nothing is left open on failure.
    pub fn open<P>(provider: &P, name: String) -> Result<Self>
    where
        P: AuthProvider<Handle = H> + ?Sized,
    {
        if name.is_empty() {
            return Err(Error::AuthContext {
                user: name,
                reason: "empty account name".to_string(),
            });
        }

        let handle = provider.open(&name)?;
        debug!(user = %name, "authentication context opened");

        Ok(Self {
            name,
            handle: Some(handle),
            status: AuthStatus::Unset,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn status(&self) -> AuthStatus {
        self.status
    }

    /// Verify credentials and, only if that succeeds, account validity.
    ///
    /// Returns `true` only when both steps succeed. The last status is kept
    /// on `self` for diagnostics.
    pub fn authenticate(&mut self) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };

        self.status = handle.verify_credentials();
        if self.status.is_success() {
            self.status = handle.check_account();
        }

        if self.status.is_success() {
            info!(user = %self.name, "authentication succeeded");
            true
        } else {
            warn!(user = %self.name, status = %self.status, "authentication failed");
            false
        }
    }

    /// Close the provider context now instead of at scope exit.
    pub fn release(self) {
        drop(self);
    }
}

impl<H: AuthHandle> Drop for UserInfo<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(user = %self.name, status = %self.status, "closing authentication context");
            handle.close(self.status);
        }
    }
}

impl<H: AuthHandle> fmt::Debug for UserInfo<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInfo")
            .field("name", &self.name)
            .field("open", &self.handle.is_some())
            .field("status", &self.status)
            .finish()
    }
}
