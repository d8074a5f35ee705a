//! Login manager backend (`systemd-logind`).

use super::SessionOwner;
use crate::{account::AccountDatabase, Result};
use std::{cell::RefCell, collections::HashMap};
use tracing::{debug, warn};
use zbus::{blocking::Connection, proxy, zvariant::OwnedObjectPath};

/// Session queries offered by a login manager.
pub trait LoginManager {
    /// Identifiers of all current sessions.
    ///
    /// # Errors
    /// Returns an error if the session list cannot be obtained.
    fn sessions(&self) -> Result<Vec<String>>;

    /// # Errors
    /// Returns an error if the session has no VT or cannot be queried.
    fn session_vt(&self, id: &str) -> Result<u32>;

    /// # Errors
    /// Returns an error if the session cannot be queried.
    fn session_uid(&self, id: &str) -> Result<u32>;
}

impl<M: LoginManager + ?Sized> LoginManager for &M {
    fn sessions(&self) -> Result<Vec<String>> {
        (**self).sessions()
    }

    fn session_vt(&self, id: &str) -> Result<u32> {
        (**self).session_vt(id)
    }

    fn session_uid(&self, id: &str) -> Result<u32> {
        (**self).session_uid(id)
    }
}

/// Resolves the owner of a VT from login manager sessions.
#[derive(Debug)]
pub struct LogindResolver<M, A> {
    manager: M,
    accounts: A,
}

impl<M: LoginManager, A: AccountDatabase> LogindResolver<M, A> {
    pub const fn new(manager: M, accounts: A) -> Self {
        Self { manager, accounts }
    }

    fn owner_name(&self, id: &str) -> Option<String> {
        let uid = match self.manager.session_uid(id) {
            Ok(uid) => uid,
            Err(e) => {
                warn!(session = id, "skipping session, uid unavailable: {e}");
                return None;
            }
        };

        match self.accounts.name_by_uid(uid) {
            Ok(Some(name)) if !name.is_empty() => Some(name),
            Ok(_) => {
                warn!(session = id, uid, "skipping session, no account record");
                None
            }
            Err(e) => {
                warn!(session = id, uid, "skipping session, account lookup failed: {e}");
                None
            }
        }
    }
}

impl<M: LoginManager, A: AccountDatabase> SessionOwner for LogindResolver<M, A> {
    fn owner_of(&self, vt: u32) -> Result<Option<String>> {
        let sessions = self.manager.sessions()?;
        debug!(count = sessions.len(), vt, "scanning login sessions");

        for id in &sessions {
            match self.manager.session_vt(id) {
                Ok(session_vt) if session_vt == vt => {}
                Ok(_) => continue,
                Err(e) => {
                    debug!(session = %id, "no VT for session: {e}");
                    continue;
                }
            }

            if let Some(name) = self.owner_name(id) {
                debug!(session = %id, vt, user = %name, "login session match");
                return Ok(Some(name));
            }
        }

        Ok(None)
    }
}

#[proxy(
    interface = "org.freedesktop.login1.Manager",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1"
)]
trait Manager {
    /// Returns `(id, uid, user, seat, path)` per session.
    fn list_sessions(&self) -> zbus::Result<Vec<(String, u32, String, String, OwnedObjectPath)>>;

    fn get_session(&self, session_id: &str) -> zbus::Result<OwnedObjectPath>;
}

#[proxy(
    interface = "org.freedesktop.login1.Session",
    default_service = "org.freedesktop.login1"
)]
trait Session {
    #[zbus(property, name = "VTNr")]
    fn vt_nr(&self) -> zbus::Result<u32>;
}

/// `systemd-logind` on the system bus.
pub struct Logind {
    connection: Connection,
    manager: ManagerProxyBlocking<'static>,
    // uid and object path per session id, from the last `ListSessions`.
    listed: RefCell<HashMap<String, (u32, OwnedObjectPath)>>,
}

impl Logind {
    /// Connect to the system bus.
    ///
    /// # Errors
    /// Returns `Error::LoginManager` if the bus or the manager is unreachable.
    pub fn connect() -> Result<Self> {
        let connection = Connection::system()?;
        let manager = ManagerProxyBlocking::new(&connection)?;
        Ok(Self {
            connection,
            manager,
            listed: RefCell::default(),
        })
    }

    fn session_path(&self, id: &str) -> Result<OwnedObjectPath> {
        if let Some((_, path)) = self.listed.borrow().get(id) {
            return Ok(path.clone());
        }
        Ok(self.manager.get_session(id)?)
    }
}

impl LoginManager for Logind {
    fn sessions(&self) -> Result<Vec<String>> {
        let list = self.manager.list_sessions()?;
        let ids = list.iter().map(|(id, ..)| id.clone()).collect();
        *self.listed.borrow_mut() = list
            .into_iter()
            .map(|(id, uid, _, _, path)| (id, (uid, path)))
            .collect();
        Ok(ids)
    }

    fn session_vt(&self, id: &str) -> Result<u32> {
        let session = SessionProxyBlocking::builder(&self.connection)
            .path(self.session_path(id)?)?
            .build()?;
        let vt = session.vt_nr()?;
        if vt == 0 {
            // Sessions without a seat VT report 0.
            return Err(zbus::Error::Failure(format!("session {id} has no VT")).into());
        }
        Ok(vt)
    }

    fn session_uid(&self, id: &str) -> Result<u32> {
        self.listed
            .borrow()
            .get(id)
            .map(|(uid, _)| *uid)
            .ok_or_else(|| zbus::Error::Failure(format!("session {id} is not listed")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Row {
        id: &'static str,
        vt: Option<u32>,
        uid: Option<u32>,
    }

    struct Fake {
        sessions: Vec<Row>,
        uid_queries: RefCell<Vec<String>>,
    }

    impl Fake {
        fn new(sessions: Vec<Row>) -> Self {
            Self {
                sessions,
                uid_queries: RefCell::default(),
            }
        }

        fn find(&self, id: &str) -> Option<&Row> {
            self.sessions.iter().find(|s| s.id == id)
        }
    }

    fn unavailable() -> Error {
        Error::LoginManager(zbus::Error::Failure("unavailable".to_string()))
    }

    impl LoginManager for Fake {
        fn sessions(&self) -> Result<Vec<String>> {
            Ok(self.sessions.iter().map(|s| s.id.to_string()).collect())
        }

        fn session_vt(&self, id: &str) -> Result<u32> {
            self.find(id).and_then(|s| s.vt).ok_or_else(unavailable)
        }

        fn session_uid(&self, id: &str) -> Result<u32> {
            self.uid_queries.borrow_mut().push(id.to_string());
            self.find(id).and_then(|s| s.uid).ok_or_else(unavailable)
        }
    }

    struct Accounts(HashMap<u32, &'static str>);

    impl AccountDatabase for Accounts {
        fn name_by_uid(&self, uid: u32) -> Result<Option<String>> {
            Ok(self.0.get(&uid).map(|name| (*name).to_string()))
        }
    }

    fn accounts() -> Accounts {
        Accounts(HashMap::from([(500, "alice"), (501, "bob")]))
    }

    #[test]
    fn test_matches_only_the_target_vt() {
        let fake = Fake::new(vec![
            Row { id: "1", vt: Some(3), uid: Some(500) },
            Row { id: "2", vt: Some(7), uid: Some(501) },
        ]);
        let resolver = LogindResolver::new(&fake, accounts());

        assert_eq!(resolver.owner_of(7).ok(), Some(Some("bob".to_string())));
        assert_eq!(*fake.uid_queries.borrow(), vec!["2".to_string()]);
    }

    #[test]
    fn test_skips_sessions_with_failing_queries() {
        let fake = Fake::new(vec![
            Row { id: "c1", vt: None, uid: Some(500) },
            Row { id: "c2", vt: Some(2), uid: None },
            Row { id: "c3", vt: Some(2), uid: Some(999) },
            Row { id: "c4", vt: Some(2), uid: Some(500) },
        ]);
        let resolver = LogindResolver::new(&fake, accounts());

        assert_eq!(resolver.owner_of(2).ok(), Some(Some("alice".to_string())));
    }

    #[test]
    fn test_absent_vt_is_not_found() {
        let fake = Fake::new(vec![Row { id: "1", vt: Some(3), uid: Some(500) }]);
        let resolver = LogindResolver::new(&fake, accounts());

        assert_eq!(resolver.owner_of(9).ok(), Some(None));
        assert!(fake.uid_queries.borrow().is_empty());
    }

    #[test]
    fn test_session_list_failure_is_fatal() {
        struct Down;

        impl LoginManager for Down {
            fn sessions(&self) -> Result<Vec<String>> {
                Err(unavailable())
            }

            fn session_vt(&self, _id: &str) -> Result<u32> {
                unreachable!("no sessions to query")
            }

            fn session_uid(&self, _id: &str) -> Result<u32> {
                unreachable!("no sessions to query")
            }
        }

        let resolver = LogindResolver::new(Down, accounts());
        assert!(matches!(resolver.owner_of(1), Err(Error::LoginManager(_))));
    }
}
