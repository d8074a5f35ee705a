use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to determine the user of tty{vt}")]
    UnknownUser { vt: u32 },
    #[error("login manager query failed: {0}")]
    LoginManager(#[from] zbus::Error),
    #[error("no authentication context available for user {user}: {reason}")]
    AuthContext { user: String, reason: String },
    #[error("no password file entry for uid 0 found")]
    NoSuperuser,
    #[error("account database lookup failed: {0}")]
    AccountDatabase(#[from] nix::errno::Errno),
}
