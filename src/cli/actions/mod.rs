pub mod unlock;
pub mod whoami;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::{
    account::SystemAccounts,
    auth::{AuthProvider, UserInfo},
    resolve,
    session::{
        logind::{Logind, LogindResolver},
        tty::{console_owner, DEV_DIR},
        utmp::UtmpScanner,
        Backend, SessionOwner,
    },
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub enum Action {
    Whoami(Target),
    Unlock(unlock::Args),
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute()`.
    // When adding new actions, extend the match in `run::execute`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub fn execute(self) -> Result<()> {
        run::execute(self)
    }
}

/// The terminal whose owner is resolved, and how.
#[derive(Debug, Clone)]
pub struct Target {
    pub vt: u32,
    pub owner: Option<u32>,
    pub backend: Backend,
    pub utmp_path: PathBuf,
}

impl Target {
    /// Explicit owner, or the owner of the console device.
    #[must_use]
    pub fn fallback_owner(&self) -> Option<u32> {
        self.owner
            .or_else(|| console_owner(Path::new(DEV_DIR), self.vt))
    }

    fn session_owner(&self) -> Result<Box<dyn SessionOwner>> {
        let backend = self.backend.detect();
        debug!(vt = self.vt, %backend, "selected session backend");

        Ok(match backend {
            Backend::Logind => {
                let logind = Logind::connect().context("login manager unavailable")?;
                Box::new(LogindResolver::new(logind, SystemAccounts))
            }
            // `detect` settles `Auto` on a concrete backend.
            Backend::Utmp | Backend::Auto => Box::new(UtmpScanner::new(&self.utmp_path)),
        })
    }

    /// Name of the user owning the terminal.
    ///
    /// # Errors
    /// Returns an error if the owner cannot be determined.
    pub fn owner_name(&self) -> Result<String> {
        let owner = self.fallback_owner();
        let backend = self.session_owner()?;
        Ok(resolve::resolve_owner(&*backend, &SystemAccounts, self.vt, owner)?)
    }

    /// Resolve the owner and open an authentication context for it.
    ///
    /// # Errors
    /// Returns an error if the owner cannot be determined or the provider fails.
    pub fn identify<P: AuthProvider>(&self, provider: &P) -> Result<UserInfo<P::Handle>> {
        let name = self.owner_name()?;
        info!(vt = self.vt, user = %name, "resolved terminal owner");
        Ok(UserInfo::open(provider, name)?)
    }
}
