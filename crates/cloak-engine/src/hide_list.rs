//! Canonical in-memory hide list: package name -> set of process names.

use std::collections::{BTreeMap, BTreeSet};

/// Outcome of removing a single process from a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotFound,
    Removed {
        /// The removal emptied the package's process set, dropping the
        /// package entry itself.
        package_emptied: bool,
    },
}

/// Mapping from package name to the processes hidden for it. BTree ordering
/// gives the deterministic, locale-independent listing order.
#[derive(Debug, Default)]
pub struct HideList {
    map: BTreeMap<String, BTreeSet<String>>,
}

impl HideList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; returns false if it was already present.
    pub fn insert(&mut self, pkg: &str, proc: &str) -> bool {
        self.map
            .entry(pkg.to_string())
            .or_default()
            .insert(proc.to_string())
    }

    /// Remove an entire package and all its processes.
    pub fn remove_package(&mut self, pkg: &str) -> bool {
        self.map.remove(pkg).is_some()
    }

    /// Remove one process from a package, dropping the package when its
    /// process set empties.
    pub fn remove_process(&mut self, pkg: &str, proc: &str) -> RemoveOutcome {
        let Some(procs) = self.map.get_mut(pkg) else {
            return RemoveOutcome::NotFound;
        };
        if !procs.remove(proc) {
            return RemoveOutcome::NotFound;
        }
        let package_emptied = procs.is_empty();
        if package_emptied {
            self.map.remove(pkg);
        }
        RemoveOutcome::Removed { package_emptied }
    }

    pub fn contains_package(&self, pkg: &str) -> bool {
        self.map.contains_key(pkg)
    }

    pub fn contains(&self, pkg: &str, proc: &str) -> bool {
        self.map.get(pkg).is_some_and(|procs| procs.contains(proc))
    }

    pub fn processes(&self, pkg: &str) -> Option<&BTreeSet<String>> {
        self.map.get(pkg)
    }

    /// Deterministic (package, process) traversal, package then process.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.map
            .iter()
            .flat_map(|(pkg, procs)| {
                procs
                    .iter()
                    .map(move |proc| (pkg.clone(), proc.clone()))
            })
            .collect()
    }
}
