//! Session owner backends.

pub mod logind;
pub mod tty;
pub mod utmp;

use crate::Result;
use std::{fmt, path::Path, str::FromStr};

/// Width of the `ut_line` field of a session record.
pub const LINE_SIZE: usize = libc::__UT_LINESIZE;

/// Marker present on hosts booted with systemd (see `sd_booted(3)`).
pub const SYSTEMD_SEATS: &str = "/run/systemd/seats";

/// Finds the account name of the user logged in on a virtual terminal.
pub trait SessionOwner {
    /// `Ok(None)` means "not found" and lets the caller fall back.
    ///
    /// # Errors
    /// Returns an error only for failures that make this backend unusable.
    fn owner_of(&self, vt: u32) -> Result<Option<String>>;
}

impl<S: SessionOwner + ?Sized> SessionOwner for &S {
    fn owner_of(&self, vt: u32) -> Result<Option<String>> {
        (**self).owner_of(vt)
    }
}

/// Terminal line name (`ttyN`), bounded to the record field width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtyLine(String);

impl TtyLine {
    #[must_use]
    pub fn new(vt: u32) -> Self {
        let mut line = format!("tty{vt}");
        // ASCII only, so any byte index is a char boundary.
        line.truncate(LINE_SIZE);
        Self(line)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for TtyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which owner backend to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Login manager when the host runs systemd, session records otherwise.
    #[default]
    Auto,
    Utmp,
    Logind,
}

impl Backend {
    pub const VARIANTS: [&'static str; 3] = ["auto", "utmp", "logind"];

    /// Resolve `Auto` against the host.
    #[must_use]
    pub fn detect(self) -> Self {
        self.detect_with(Path::new(SYSTEMD_SEATS))
    }

    #[must_use]
    pub fn detect_with(self, seats: &Path) -> Self {
        match self {
            Self::Auto if seats.is_dir() => Self::Logind,
            Self::Auto => Self::Utmp,
            other => other,
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "utmp" => Ok(Self::Utmp),
            "logind" | "systemd" => Ok(Self::Logind),
            _ => Err(format!("invalid backend: {s}")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Utmp => "utmp",
            Self::Logind => "logind",
        };
        f.write_str(name)
    }
}
