//! Identity resolution: backend lookup, fallback owner, then provider binding.

use crate::{
    account::{self, AccountDatabase},
    auth::{AuthProvider, UserInfo},
    session::{
        logind::{LoginManager, LogindResolver},
        utmp::UtmpScanner,
        SessionOwner,
    },
    Error, Result,
};
use tracing::{debug, info};

/// Name of the user owning `vt`, falling back to `owner`.
///
/// # Errors
/// Returns `Error::UnknownUser` if neither the backend nor the fallback owner
/// yields a name, or the backend's own fatal error.
pub fn resolve_owner<S, A>(
    backend: &S,
    accounts: &A,
    vt: u32,
    owner: Option<u32>,
) -> Result<String>
where
    S: SessionOwner + ?Sized,
    A: AccountDatabase + ?Sized,
{
    if let Some(name) = backend.owner_of(vt)?.filter(|name| !name.is_empty()) {
        return Ok(name);
    }

    debug!(vt, ?owner, "no session found, trying fallback owner");
    account::fallback_owner(accounts, owner).ok_or(Error::UnknownUser { vt })
}

/// Resolve the owner of `vt` and bind it to `provider`.
///
/// # Errors
/// See [`resolve_owner`]; also fails if the provider cannot be started.
pub fn identify<S, A, P>(
    backend: &S,
    accounts: &A,
    provider: &P,
    vt: u32,
    owner: Option<u32>,
) -> Result<UserInfo<P::Handle>>
where
    S: SessionOwner + ?Sized,
    A: AccountDatabase + ?Sized,
    P: AuthProvider + ?Sized,
{
    let name = resolve_owner(backend, accounts, vt, owner)?;
    info!(vt, user = %name, "resolved terminal owner");
    UserInfo::open(provider, name)
}

/// Owner of `vt` according to the session records.
///
/// # Errors
/// See [`identify`].
pub fn from_session_records<A, P>(
    records: &UtmpScanner,
    accounts: &A,
    provider: &P,
    vt: u32,
    owner: Option<u32>,
) -> Result<UserInfo<P::Handle>>
where
    A: AccountDatabase + ?Sized,
    P: AuthProvider + ?Sized,
{
    identify(records, accounts, provider, vt, owner)
}

/// Owner of `vt` according to the login manager.
///
/// # Errors
/// See [`identify`]; a failed session list query is fatal.
pub fn from_login_manager<M, A, P>(
    manager: &M,
    accounts: &A,
    provider: &P,
    vt: u32,
    owner: Option<u32>,
) -> Result<UserInfo<P::Handle>>
where
    M: LoginManager + ?Sized,
    A: AccountDatabase + ?Sized,
    P: AuthProvider + ?Sized,
{
    let resolver = LogindResolver::new(manager, accounts);
    identify(&resolver, accounts, provider, vt, owner)
}

/// The superuser, regardless of any terminal.
///
/// # Errors
/// Returns `Error::NoSuperuser` if uid 0 has no account record, or the
/// provider error.
pub fn superuser<A, P>(accounts: &A, provider: &P) -> Result<UserInfo<P::Handle>>
where
    A: AccountDatabase + ?Sized,
    P: AuthProvider + ?Sized,
{
    let name = account::superuser(accounts)?;
    UserInfo::open(provider, name)
}
