#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};
use vtlock::{
    account::AccountDatabase,
    auth::{AuthHandle, AuthProvider, AuthStatus},
    session::{
        logind::LoginManager,
        utmp::{LINE_OFFSET, RECORD_SIZE, TYPE_OFFSET, USER_OFFSET},
    },
    Error, Result,
};

pub const USER_PROCESS: i16 = vtlock::session::utmp::USER_PROCESS;
pub const DEAD_PROCESS: i16 = libc::DEAD_PROCESS;

/// In-memory password database.
#[derive(Default)]
pub struct Accounts {
    names: HashMap<u32, String>,
    pub lookups: RefCell<Vec<u32>>,
}

impl Accounts {
    pub fn with(entries: &[(u32, &str)]) -> Self {
        Self {
            names: entries
                .iter()
                .map(|(uid, name)| (*uid, (*name).to_string()))
                .collect(),
            lookups: RefCell::default(),
        }
    }
}

impl AccountDatabase for Accounts {
    fn name_by_uid(&self, uid: u32) -> Result<Option<String>> {
        self.lookups.borrow_mut().push(uid);
        Ok(self.names.get(&uid).cloned())
    }
}

/// Provider call log shared by every handle it opens.
#[derive(Debug, Default)]
pub struct Ledger {
    pub opened: Vec<String>,
    pub verify: u32,
    pub check: u32,
    pub closed: Vec<AuthStatus>,
}

/// Scripted provider: each verify/check pops the next status, defaulting to success.
#[derive(Default)]
pub struct Provider {
    pub ledger: Rc<RefCell<Ledger>>,
    verify: Rc<RefCell<VecDeque<AuthStatus>>>,
    check: Rc<RefCell<VecDeque<AuthStatus>>>,
    refuse: bool,
}

impl Provider {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn scripted(verify: &[AuthStatus], check: &[AuthStatus]) -> Self {
        Self {
            verify: Rc::new(RefCell::new(verify.iter().copied().collect())),
            check: Rc::new(RefCell::new(check.iter().copied().collect())),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.ledger.borrow().opened.clone()
    }

    pub fn closed(&self) -> Vec<AuthStatus> {
        self.ledger.borrow().closed.clone()
    }
}

pub struct Handle {
    ledger: Rc<RefCell<Ledger>>,
    verify: Rc<RefCell<VecDeque<AuthStatus>>>,
    check: Rc<RefCell<VecDeque<AuthStatus>>>,
}

impl AuthProvider for Provider {
    type Handle = Handle;

    fn open(&self, user: &str) -> Result<Handle> {
        if self.refuse {
            return Err(Error::AuthContext {
                user: user.to_string(),
                reason: "service unavailable".to_string(),
            });
        }
        self.ledger.borrow_mut().opened.push(user.to_string());
        Ok(Handle {
            ledger: Rc::clone(&self.ledger),
            verify: Rc::clone(&self.verify),
            check: Rc::clone(&self.check),
        })
    }
}

impl AuthHandle for Handle {
    fn verify_credentials(&mut self) -> AuthStatus {
        self.ledger.borrow_mut().verify += 1;
        self.verify.borrow_mut().pop_front().unwrap_or(AuthStatus::Success)
    }

    fn check_account(&mut self) -> AuthStatus {
        self.ledger.borrow_mut().check += 1;
        self.check.borrow_mut().pop_front().unwrap_or(AuthStatus::Success)
    }

    fn close(self, last_status: AuthStatus) {
        self.ledger.borrow_mut().closed.push(last_status);
    }
}

/// Login manager with a fixed session table: `(id, vt, uid)`, `None` meaning the query fails.
pub struct Sessions {
    table: Vec<(String, Option<u32>, Option<u32>)>,
    down: bool,
}

impl Sessions {
    pub fn new(table: &[(&str, Option<u32>, Option<u32>)]) -> Self {
        Self {
            table: table
                .iter()
                .map(|(id, vt, uid)| ((*id).to_string(), *vt, *uid))
                .collect(),
            down: false,
        }
    }

    pub fn down() -> Self {
        Self {
            table: Vec::new(),
            down: true,
        }
    }

    fn row(&self, id: &str) -> Option<&(String, Option<u32>, Option<u32>)> {
        self.table.iter().find(|(sid, ..)| sid == id)
    }
}

fn unavailable(what: &str) -> Error {
    Error::LoginManager(zbus::Error::Failure(format!("{what} unavailable")))
}

impl LoginManager for Sessions {
    fn sessions(&self) -> Result<Vec<String>> {
        if self.down {
            return Err(unavailable("session list"));
        }
        Ok(self.table.iter().map(|(id, ..)| id.clone()).collect())
    }

    fn session_vt(&self, id: &str) -> Result<u32> {
        self.row(id).and_then(|row| row.1).ok_or_else(|| unavailable("vt"))
    }

    fn session_uid(&self, id: &str) -> Result<u32> {
        self.row(id).and_then(|row| row.2).ok_or_else(|| unavailable("uid"))
    }
}

pub fn record(kind: i16, line: &str, user: &str) -> Vec<u8> {
    let mut raw = vec![0u8; RECORD_SIZE];
    raw[TYPE_OFFSET..TYPE_OFFSET + 2].copy_from_slice(&kind.to_ne_bytes());
    raw[LINE_OFFSET..LINE_OFFSET + line.len()].copy_from_slice(line.as_bytes());
    raw[USER_OFFSET..USER_OFFSET + user.len()].copy_from_slice(user.as_bytes());
    raw
}

/// Session record store in the temp dir, removed on drop.
pub struct UtmpFile {
    pub path: PathBuf,
}

impl UtmpFile {
    pub fn new(records: &[(i16, &str, &str)]) -> Self {
        let path = std::env::temp_dir().join(format!("vtlock-utmp-{}", uuid::Uuid::new_v4()));
        let bytes: Vec<u8> = records
            .iter()
            .flat_map(|(kind, line, user)| record(*kind, line, user))
            .collect();
        fs::write(&path, bytes).expect("failed to write utmp fixture");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UtmpFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
