use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::principal::{Identity, Profile};
use super::role::RoleTag;
use crate::error::{ClientError, ClientResult};

pub const KEY_TOKEN: &str = "token";
pub const KEY_ROLE: &str = "userRole";
pub const KEY_PROFILE: &str = "user";

/// Flat key/value snapshot as written to a backend.
pub type SessionEntries = BTreeMap<String, String>;

/// Where session keys live between views (and, for files, between runs).
/// `store` always receives the complete key set so a backend can replace it in one write.
pub trait SessionBackend: Send + Sync {
    fn load(&self) -> Result<SessionEntries>;
    fn store(&self, entries: &SessionEntries) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<SessionEntries>,
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> Result<SessionEntries> { Ok(self.entries.lock().clone()) }

    fn store(&self, entries: &SessionEntries) -> Result<()> {
        *self.entries.lock() = entries.clone();
        Ok(())
    }
}

/// JSON object on disk. Written to a sibling temp file then renamed into place.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self { Self { path: path.as_ref().to_path_buf() } }
}

impl SessionBackend for FileBackend {
    fn load(&self) -> Result<SessionEntries> {
        if !self.path.exists() {
            return Ok(SessionEntries::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading session file {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(SessionEntries::new());
        }
        let entries: SessionEntries = serde_json::from_str(&text)
            .with_context(|| format!("parsing session file {}", self.path.display()))?;
        Ok(entries)
    }

    fn store(&self, entries: &SessionEntries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating session directory {}", parent.display()))?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        let text = serde_json::to_string_pretty(entries)?;
        std::fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing session file {}", self.path.display()))?;
        Ok(())
    }
}

/// The authenticated state currently held by the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub token: String,
    pub role: RoleTag,
    pub profile: Option<Profile>,
}

impl SessionState {
    fn from_entries(entries: &SessionEntries) -> Option<Self> {
        let token = entries.get(KEY_TOKEN).filter(|t| !t.is_empty())?.clone();
        let role = entries.get(KEY_ROLE).map(|r| RoleTag::parse(r)).unwrap_or_default();
        let profile = entries.get(KEY_PROFILE).and_then(|raw| match serde_json::from_str::<Profile>(raw) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(target: "session", error = %e, "ignoring unreadable cached profile");
                None
            }
        });
        Some(Self { token, role, profile })
    }

    fn to_entries(&self) -> Result<SessionEntries> {
        let mut entries = SessionEntries::new();
        entries.insert(KEY_TOKEN.to_string(), self.token.clone());
        entries.insert(KEY_ROLE.to_string(), self.role.as_str().to_string());
        if let Some(p) = &self.profile {
            entries.insert(KEY_PROFILE.to_string(), serde_json::to_string(p)?);
        }
        Ok(entries)
    }
}

/// Owner of the session. Cloning shares the same state and backend.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Option<SessionState>>>,
    backend: Arc<dyn SessionBackend>,
}

impl Default for SessionStore {
    fn default() -> Self { Self::new(Arc::new(MemoryBackend::default())) }
}

impl SessionStore {
    /// Empty store over `backend`; call `init` to pick up an existing session.
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { state: Arc::new(RwLock::new(None)), backend }
    }

    pub fn in_memory() -> Self { Self::default() }

    pub fn with_file<P: AsRef<Path>>(path: P) -> Self { Self::new(Arc::new(FileBackend::new(path))) }

    /// Load whatever the backend holds. A missing, tokenless or unreadable record
    /// means "not authenticated"; the next write replaces an unreadable one.
    pub fn init(&self) -> ClientResult<bool> {
        let entries = match self.backend.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(target: "session", error = %format!("{:#}", e), "stored session unreadable, starting signed out");
                SessionEntries::new()
            }
        };
        let loaded = SessionState::from_entries(&entries);
        let present = loaded.is_some();
        *self.state.write() = loaded;
        debug!(target: "session", present, "session.init");
        Ok(present)
    }

    pub fn read(&self) -> Option<SessionState> { self.state.read().clone() }

    pub fn is_authenticated(&self) -> bool { self.state.read().is_some() }

    /// Replace any prior session with `identity`.
    pub fn write(&self, identity: &Identity) -> ClientResult<()> {
        let next = SessionState {
            token: identity.token.clone(),
            role: identity.role.clone(),
            profile: Some(identity.profile.clone()),
        };
        let mut guard = self.state.write();
        self.backend.store(&next.to_entries()?)?;
        *guard = Some(next);
        info!(target: "session", role = %identity.role, "session.write");
        Ok(())
    }

    /// Drop every key. Readers see either the full old session or nothing.
    pub fn clear(&self) -> ClientResult<()> {
        let mut guard = self.state.write();
        self.backend.store(&SessionEntries::new())?;
        *guard = None;
        info!(target: "session", "session.clear");
        Ok(())
    }

    pub fn token(&self) -> ClientResult<String> {
        self.state.read().as_ref().map(|s| s.token.clone()).ok_or(ClientError::SessionAbsent)
    }

    pub fn role(&self) -> Option<RoleTag> { self.state.read().as_ref().map(|s| s.role.clone()) }

    pub fn cached_profile(&self) -> Option<Profile> {
        self.state.read().as_ref().and_then(|s| s.profile.clone())
    }

    /// Cache a profile fetched after login. Requires an active session.
    pub fn update_profile(&self, profile: Profile) -> ClientResult<()> {
        let mut guard = self.state.write();
        let current = guard.as_ref().ok_or(ClientError::SessionAbsent)?;
        let next = SessionState { profile: Some(profile), ..current.clone() };
        self.backend.store(&next.to_entries()?)?;
        *guard = Some(next);
        Ok(())
    }
}

/// Store the login result, overwriting any prior session.
pub fn persist_session(store: &SessionStore, identity: &Identity) -> ClientResult<()> {
    store.write(identity)
}

pub fn clear_session(store: &SessionStore) -> ClientResult<()> {
    store.clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(token: &str, role: RoleTag) -> Identity {
        Identity {
            token: token.to_string(),
            role,
            profile: Profile {
                display_name: "Marie Dupont".into(),
                institution: "USTHB".into(),
                domain: "Imagerie".into(),
                email: "marie@usthb.dz".into(),
            },
        }
    }

    #[test]
    fn absent_until_written() {
        let store = SessionStore::in_memory();
        assert!(!store.init().unwrap());
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), Err(ClientError::SessionAbsent));
        assert!(store.cached_profile().is_none());
    }

    #[test]
    fn write_overwrites_prior_session() {
        let store = SessionStore::in_memory();
        persist_session(&store, &identity("t1", RoleTag::Communicant)).unwrap();
        persist_session(&store, &identity("t2", RoleTag::GuestSpeaker)).unwrap();
        assert_eq!(store.token().unwrap(), "t2");
        assert_eq!(store.role(), Some(RoleTag::GuestSpeaker));
    }

    #[test]
    fn clear_removes_every_key() {
        let backend = Arc::new(MemoryBackend::default());
        let store = SessionStore::new(backend.clone());
        store.write(&identity("tok", RoleTag::Participant)).unwrap();
        assert_eq!(backend.load().unwrap().len(), 3);
        clear_session(&store).unwrap();
        assert!(backend.load().unwrap().is_empty());
        assert!(store.read().is_none());
    }

    #[test]
    fn file_session_survives_a_new_store() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("session.json");
        let first = SessionStore::with_file(&path);
        first.write(&identity("persisted", RoleTag::ScientificCommittee)).unwrap();

        let second = SessionStore::with_file(&path);
        assert!(second.init().unwrap());
        let state = second.read().unwrap();
        assert_eq!(state.token, "persisted");
        assert_eq!(state.role, RoleTag::ScientificCommittee);
        assert_eq!(state.profile.unwrap().display_name, "Marie Dupont");

        second.clear().unwrap();
        let third = SessionStore::with_file(&path);
        assert!(!third.init().unwrap());
    }

    #[test]
    fn stored_keys_match_portal_layout() {
        let backend = Arc::new(MemoryBackend::default());
        let store = SessionStore::new(backend.clone());
        store.write(&identity("abc", RoleTag::Unrecognized("keynote".into()))).unwrap();
        let entries = backend.load().unwrap();
        assert_eq!(entries.get(KEY_TOKEN).map(String::as_str), Some("abc"));
        assert_eq!(entries.get(KEY_ROLE).map(String::as_str), Some("keynote"));
        let user: serde_json::Value = serde_json::from_str(entries.get(KEY_PROFILE).unwrap()).unwrap();
        assert_eq!(user["name"], "Marie Dupont");
        assert_eq!(user["institution"], "USTHB");
    }

    #[test]
    fn partial_cached_profile_takes_defaults() {
        let backend = Arc::new(MemoryBackend::default());
        let mut entries = SessionEntries::new();
        entries.insert(KEY_TOKEN.into(), "tok".into());
        entries.insert(KEY_PROFILE.into(), r#"{"name":"Ali","institution":"CERIST"}"#.into());
        backend.store(&entries).unwrap();
        let store = SessionStore::new(backend);
        assert!(store.init().unwrap());
        assert_eq!(store.role(), Some(RoleTag::Participant));
        let p = store.cached_profile().unwrap();
        assert_eq!(p.display_name, "Ali");
        assert_eq!(p.domain, "Domaine non spécifié");
        assert_eq!(p.email, "");
    }

    #[test]
    fn update_profile_requires_session() {
        let store = SessionStore::in_memory();
        assert_eq!(store.update_profile(Profile::default()), Err(ClientError::SessionAbsent));
        store.write(&identity("tok", RoleTag::Participant)).unwrap();
        let mut p = Profile::default();
        p.display_name = "Autre".into();
        store.update_profile(p).unwrap();
        assert_eq!(store.cached_profile().unwrap().display_name, "Autre");
        assert_eq!(store.token().unwrap(), "tok");
    }

    #[test]
    fn corrupt_session_file_reads_as_signed_out() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::with_file(&path);
        assert!(!store.init().unwrap());
        assert!(!store.is_authenticated());

        store.write(&identity("fresh", RoleTag::Communicant)).unwrap();
        let reloaded = SessionStore::with_file(&path);
        assert!(reloaded.init().unwrap());
        assert_eq!(reloaded.token().unwrap(), "fresh");
    }
}
