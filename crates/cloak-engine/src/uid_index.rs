//! Derived cache mapping app identities to installed hidden packages.
//!
//! Rebuilt by walking the per-user app-data tree two levels deep; a full
//! rescan is skipped whenever the package registry file's inode is
//! unchanged, which makes the refresh cheap enough for the hot path.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;
use tracing::debug;

use crate::hide_list::HideList;
use crate::to_app_id;

/// Reserved app id collecting package-independent sandboxed-worker matches.
pub const ANY_SANDBOX_APP_ID: i32 = -1;

/// Filesystem locations the index is derived from, plus the identity of the
/// privileged manager application to look for while scanning.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// System package registry file, stat'd for inode fingerprinting.
    pub package_registry: PathBuf,
    /// Per-user app-data tree: one directory per user, one per package.
    pub app_data_dir: PathBuf,
    /// Package name of the manager application, if one is configured.
    pub manager_package: Option<String>,
}

#[derive(Debug, Default)]
pub struct UidIndex {
    map: BTreeMap<i32, BTreeSet<String>>,
    registry_ino: Option<u64>,
    manager_app_id: Option<i32>,
}

impl UidIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index if the registry fingerprint changed. Returns true
    /// when a rescan actually happened.
    pub fn refresh(&mut self, list: &HideList, paths: &PlatformPaths) -> bool {
        let ino = fs::metadata(&paths.package_registry).map(|m| m.ino()).ok();
        if ino == self.registry_ino {
            return false;
        }
        self.registry_ino = ino;

        debug!("hide list: rescanning installed apps");
        self.map.clear();
        self.manager_app_id = None;

        let Ok(users) = fs::read_dir(&paths.app_data_dir) else {
            return true;
        };
        for user in users.flatten() {
            let Ok(pkgs) = fs::read_dir(user.path()) else {
                continue;
            };
            for entry in pkgs.flatten() {
                let Ok(meta) = entry.metadata() else {
                    continue;
                };
                let app_id = to_app_id(meta.uid());
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if self.manager_app_id.is_none()
                    && paths.manager_package.as_deref() == Some(name)
                {
                    self.manager_app_id = Some(app_id);
                }
                if self.map.contains_key(&app_id) {
                    // First user wins; duplicates are not reconciled
                    continue;
                }
                if list.contains_package(name) {
                    self.map.entry(app_id).or_default().insert(name.to_string());
                }
            }
        }
        true
    }

    /// Fast path for a single list edit: locate the one package directory
    /// under any user and add or remove its association, without rescanning.
    pub fn update_single(&mut self, pkg: &str, removed: bool, paths: &PlatformPaths) {
        let Ok(users) = fs::read_dir(&paths.app_data_dir) else {
            return;
        };
        for user in users.flatten() {
            let candidate = user.path().join(pkg);
            let Ok(meta) = fs::metadata(&candidate) else {
                continue;
            };
            let app_id = to_app_id(meta.uid());
            if removed {
                if let Some(set) = self.map.get_mut(&app_id) {
                    set.remove(pkg);
                    if set.is_empty() {
                        self.map.remove(&app_id);
                    }
                }
            } else {
                self.map.entry(app_id).or_default().insert(pkg.to_string());
            }
            break;
        }
    }

    pub fn packages_for(&self, app_id: i32) -> Option<&BTreeSet<String>> {
        self.map.get(&app_id)
    }

    /// Cached app identity of the privileged manager application; reset to
    /// unknown whenever the registry fingerprint changes.
    pub fn manager_app_id(&self) -> Option<i32> {
        self.manager_app_id
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
