//! # cloak-engine
//!
//! The membership engine behind the cloak daemon: the canonical hide list,
//! the uid-to-package index derived from the per-user app-data tree, the
//! live-process matcher, and the enable/disable lifecycle that ties them to
//! the durable store and the monitor thread.
//!
//! All list and index state lives behind one mutex inside [`HideEngine`];
//! the enabled flag is additionally mirrored in a lock-free atomic so the
//! hot membership probe can reject without touching the engine at all.

pub mod engine;
pub mod hide_list;
pub mod monitor;
pub mod reaper;
pub mod uid_index;
pub mod validate;

mod error;

pub use engine::{EngineConfig, HideEngine, HideSupport, NoSupport};
pub use error::EngineError;
pub use monitor::{MonitorControl, MonitorSignal};
pub use reaper::{MatchRule, ProcfsReaper, Reaper};
pub use uid_index::{PlatformPaths, UidIndex, ANY_SANDBOX_APP_ID};
pub use validate::{validate, ISOLATED_PKG};

/// Size of one user's uid range; an app's identity class is its uid modulo
/// this value.
pub const PER_USER_RANGE: u32 = 100_000;

/// App ids at or above this value belong to sandboxed worker processes.
pub const SANDBOX_APP_ID_THRESHOLD: i32 = 90_000;

/// Derive the app identity class from a process's owning uid.
pub fn to_app_id(uid: u32) -> i32 {
    (uid % PER_USER_RANGE) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_app_id_strips_user() {
        assert_eq!(to_app_id(10123), 10123);
        assert_eq!(to_app_id(1_010_123), 10123);
        assert_eq!(to_app_id(90001), 90001);
    }
}
