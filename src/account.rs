//! Account database lookups: fallback owner and superuser resolution.

use crate::{Error, Result};
use nix::{
    errno::Errno,
    unistd::{Uid, User},
};
use tracing::{debug, warn};

/// Sentinel meaning "no owner", i.e. `(uid_t)-1`.
pub const NO_OWNER: u32 = u32::MAX;

pub const SUPERUSER_UID: u32 = 0;

/// Maps numeric account identifiers to account names.
pub trait AccountDatabase {
    /// # Errors
    /// Returns an error if the lookup itself fails. A missing record is `Ok(None)`.
    fn name_by_uid(&self, uid: u32) -> Result<Option<String>>;
}

/// The host's password database (`getpwuid_r`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccounts;

impl AccountDatabase for SystemAccounts {
    fn name_by_uid(&self, uid: u32) -> Result<Option<String>> {
        Ok(User::from_uid(Uid::from_raw(uid))?.map(|user| user.name))
    }
}

impl<T: AccountDatabase + ?Sized> AccountDatabase for &T {
    fn name_by_uid(&self, uid: u32) -> Result<Option<String>> {
        (**self).name_by_uid(uid)
    }
}

/// Resolve the fallback owner to an account name.
///
/// Absent owners, the `NO_OWNER` sentinel and lookup failures all yield `None`.
pub fn fallback_owner<A>(accounts: &A, owner: Option<u32>) -> Option<String>
where
    A: AccountDatabase + ?Sized,
{
    let uid = owner.filter(|&uid| uid != NO_OWNER)?;

    match accounts.name_by_uid(uid) {
        Ok(Some(name)) if !name.is_empty() => {
            debug!(uid, name = %name, "resolved fallback owner");
            Some(name)
        }
        Ok(_) => {
            debug!(uid, "fallback owner has no account record");
            None
        }
        Err(e) => {
            warn!(uid, "fallback owner lookup failed: {e}");
            None
        }
    }
}

/// Resolve the account name bound to uid 0.
///
/// # Errors
/// Returns `Error::NoSuperuser` if the record does not exist, or the lookup
/// error if it fails for any reason other than an interrupted call.
pub fn superuser<A: AccountDatabase + ?Sized>(accounts: &A) -> Result<String> {
    loop {
        match accounts.name_by_uid(SUPERUSER_UID) {
            Err(Error::AccountDatabase(Errno::EINTR)) => continue,
            Err(e) => return Err(e),
            Ok(Some(name)) if !name.is_empty() => return Ok(name),
            Ok(_) => return Err(Error::NoSuperuser),
        }
    }
}
