//! Identity, role routing and session ownership for the portal.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod role;
mod session;

pub use principal::{Identity, Profile, DEFAULT_DISPLAY_NAME, DEFAULT_DOMAIN, DEFAULT_INSTITUTION};
pub use role::{resolve_destination, RoleTag, RoutePath};
pub use session::{
    clear_session, persist_session, FileBackend, MemoryBackend, SessionBackend, SessionEntries, SessionState,
    SessionStore, KEY_PROFILE, KEY_ROLE, KEY_TOKEN,
};
