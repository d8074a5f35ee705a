//! Session record scan over the `utmp` store.
//!
//! Records follow the host's `struct utmpx` layout. Only the type tag, the
//! terminal line and the account name are read.

use super::{SessionOwner, TtyLine, LINE_SIZE};
use crate::Result;
use std::{
    fs::File,
    io::{self, BufReader, ErrorKind, Read},
    mem::{offset_of, size_of},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const UTMP_PATH: &str = "/var/run/utmp";

pub const RECORD_SIZE: usize = size_of::<libc::utmpx>();
pub const USER_SIZE: usize = libc::__UT_NAMESIZE;

pub const TYPE_OFFSET: usize = offset_of!(libc::utmpx, ut_type);
pub const LINE_OFFSET: usize = offset_of!(libc::utmpx, ut_line);
pub const USER_OFFSET: usize = offset_of!(libc::utmpx, ut_user);

/// `ut_type` of a normal login session.
pub const USER_PROCESS: i16 = libc::USER_PROCESS;

/// The fields of one session record this crate cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub kind: i16,
    pub line: &'a [u8],
    pub user: &'a [u8],
}

impl<'a> Record<'a> {
    #[must_use]
    pub fn parse(raw: &'a [u8; RECORD_SIZE]) -> Self {
        let kind = i16::from_ne_bytes([raw[TYPE_OFFSET], raw[TYPE_OFFSET + 1]]);
        Self {
            kind,
            line: field(&raw[LINE_OFFSET..LINE_OFFSET + LINE_SIZE]),
            user: field(&raw[USER_OFFSET..USER_OFFSET + USER_SIZE]),
        }
    }

    /// Account name of an active login on `line`, if this record is one.
    #[must_use]
    pub fn active_user_on(&self, line: &TtyLine) -> Option<&'a str> {
        if self.kind != USER_PROCESS || self.user.is_empty() || self.line != line.as_bytes() {
            return None;
        }
        std::str::from_utf8(self.user).ok()
    }
}

// Fixed-width text: NUL-terminated unless it fills the field.
fn field(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

fn open(path: &Path) -> io::Result<File> {
    loop {
        match File::open(path) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Reads one record. `Ok(false)` at end of store, including a truncated tail.
fn read_record<R: Read>(reader: &mut R, buf: &mut [u8; RECORD_SIZE]) -> io::Result<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// Find the active user on `line` in a stream of records.
pub fn scan<R: Read>(reader: R, line: &TtyLine) -> Option<String> {
    let mut reader = BufReader::new(reader);
    let mut buf = [0u8; RECORD_SIZE];
    let mut seen = 0usize;

    loop {
        match read_record(&mut reader, &mut buf) {
            Ok(true) => {}
            Ok(false) => break,
            // `read_exact` already retries interrupted reads.
            Err(e) => {
                warn!("session record read failed after {seen} records: {e}");
                break;
            }
        }
        seen += 1;

        if let Some(user) = Record::parse(&buf).active_user_on(line) {
            debug!(%line, user, record = seen, "session record match");
            return Some(user.to_string());
        }
    }

    debug!(%line, records = seen, "no session record match");
    None
}

/// Session record backend.
#[derive(Debug, Clone)]
pub struct UtmpScanner {
    path: PathBuf,
}

impl UtmpScanner {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for UtmpScanner {
    fn default() -> Self {
        Self::new(UTMP_PATH)
    }
}

impl SessionOwner for UtmpScanner {
    fn owner_of(&self, vt: u32) -> Result<Option<String>> {
        let file = match open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %self.path.display(), "session records unavailable: {e}");
                return Ok(None);
            }
        };

        Ok(scan(file, &TtyLine::new(vt)))
    }
}
