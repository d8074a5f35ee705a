//! # vtlock (Session Owner Resolution & Authentication Gate)
//!
//! `vtlock` answers two questions for a console locker: *who owns virtual
//! terminal N*, and *is the person at the keyboard that user*.
//!
//! ## Owner Resolution
//!
//! Two interchangeable backends implement [`session::SessionOwner`]:
//!
//! - **Session records:** a sequential scan of the `utmp` store for an active
//!   `USER_PROCESS` entry on `ttyN`.
//! - **Login manager:** a `systemd-logind` query over D-Bus, matching the
//!   session whose `VTNr` equals N.
//!
//! When the backend finds nothing, the caller-supplied fallback owner uid
//! (usually the owner of `/dev/ttyN`) is mapped through the account database.
//! If that fails too, resolution is fatal. The superuser entry point skips
//! resolution and always yields uid 0.
//!
//! ## Authentication
//!
//! A resolved name is bound to an [`auth::AuthProvider`] conversation and
//! wrapped in an [`auth::UserInfo`]. The provider context is closed exactly
//! once when the `UserInfo` is dropped, on every exit path.

pub mod account;
pub mod auth;
pub mod cli;
mod error;
pub mod resolve;
pub mod session;

pub use self::error::{Error, Result};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
