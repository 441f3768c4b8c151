//! The hide engine: lifecycle, list mutation and live-process matching.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use cloak_store::{HideStore, ENABLED_KEY};

use crate::hide_list::{HideList, RemoveOutcome};
use crate::monitor::MonitorControl;
use crate::reaper::{MatchRule, Reaper};
use crate::uid_index::{PlatformPaths, UidIndex, ANY_SANDBOX_APP_ID};
use crate::validate::{validate, ISOLATED_PKG};
use crate::{to_app_id, EngineError, SANDBOX_APP_ID_THRESHOLD};

/// Engine knobs and host filesystem layout.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub package_registry: PathBuf,
    pub app_data_dir: PathBuf,
    pub proc_root: PathBuf,
    /// Package name of the manager application trusted to edit the list.
    pub manager_package: Option<String>,
    /// Gates the worker-pool sweep performed on enable.
    pub sdk_level: u32,
    /// Length gate for truncated command-line prefix matches.
    pub max_prefix_len: usize,
}

/// Collaborators the lifecycle hands off to. Property hiding and the monitor
/// loop body are implemented outside this engine.
pub trait HideSupport: Send + Sync {
    fn hide_sensitive_props(&self) {}
    fn hide_late_props(&self) {}
    /// Runs on the monitor thread for every refresh signal.
    fn refresh_monitor(&self) {}
}

/// No-op collaborators.
pub struct NoSupport;
impl HideSupport for NoSupport {}

struct HideState {
    list: HideList,
    uids: UidIndex,
}

/// The membership engine. One mutex guards the lazily built list and uid
/// index; the enabled flag is mirrored in an atomic for the lock-free
/// fast-reject in [`HideEngine::check`].
pub struct HideEngine {
    enabled: AtomicBool,
    state: Mutex<Option<HideState>>,
    db: Mutex<HideStore>,
    reaper: Box<dyn Reaper>,
    support: Arc<dyn HideSupport>,
    monitor: MonitorControl,
    cfg: EngineConfig,
}

impl HideEngine {
    pub fn new(
        cfg: EngineConfig,
        db: HideStore,
        reaper: Box<dyn Reaper>,
        support: Arc<dyn HideSupport>,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            state: Mutex::new(None),
            db: Mutex::new(db),
            reaper,
            support,
            monitor: MonitorControl::new(),
            cfg,
        }
    }

    /// Lock-free enabled probe for hot-path callers.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn platform_paths(&self) -> PlatformPaths {
        PlatformPaths {
            package_registry: self.cfg.package_registry.clone(),
            app_data_dir: self.cfg.app_data_dir.clone(),
            manager_package: self.cfg.manager_package.clone(),
        }
    }

    /// App identity of the configured manager package, if it is installed.
    /// Resolved by the same registry-gated scan that builds the uid index.
    pub fn manager_app_id(&self) -> Result<Option<i32>, EngineError> {
        let mut guard = self.state.lock().unwrap();
        let state = self.init_state(&mut guard)?;
        let HideState { list, uids } = state;
        uids.refresh(list, &self.platform_paths());
        Ok(uids.manager_app_id())
    }

    /// Insert into the list and, for a brand-new pair, terminate any
    /// already-running instance of the target. Isolated patterns are
    /// prefixes and may match many live workers; normal entries name one
    /// exact process.
    fn add_to_set(&self, list: &mut HideList, pkg: &str, proc: &str) -> bool {
        if !list.insert(pkg, proc) {
            return false;
        }
        info!(pkg, proc, "hide list add");
        if pkg == ISOLATED_PKG {
            self.reaper.kill_matching(proc, MatchRule::Prefix, true);
        } else {
            self.reaper.kill_matching(proc, MatchRule::Exact, false);
        }
        true
    }

    /// Lazy initialization: bulk-load persisted entries (replaying the
    /// insertion kill sweep for each) and build the uid index. Either fully
    /// succeeds or leaves the state absent.
    fn init_state<'a>(
        &self,
        slot: &'a mut Option<HideState>,
    ) -> Result<&'a mut HideState, EngineError> {
        if slot.is_none() {
            info!("hide list: initializing internal data structures");
            let rows = self.db.lock().unwrap().load_all()?;
            let mut list = HideList::new();
            for (pkg, proc) in &rows {
                self.add_to_set(&mut list, pkg, proc);
            }
            let mut uids = UidIndex::new();
            uids.refresh(&list, &self.platform_paths());
            *slot = Some(HideState { list, uids });
        }
        Ok(slot.as_mut().unwrap())
    }

    /// Add a hide entry. Empty `proc` defaults to the package name.
    pub fn add(&self, pkg: &str, proc: &str) -> Result<(), EngineError> {
        let proc = if proc.is_empty() { pkg } else { proc };
        if !validate(pkg, proc) {
            return Err(EngineError::InvalidName);
        }

        {
            let mut guard = self.state.lock().unwrap();
            let state = self.init_state(&mut guard)?;
            if !self.add_to_set(&mut state.list, pkg, proc) {
                return Err(EngineError::ItemExists);
            }
            state.uids.update_single(pkg, false, &self.platform_paths());
        }

        // Write-through after releasing the state lock. On failure the
        // in-memory entry is kept; the store reconverges on the next full
        // reload (accepted inconsistency window).
        self.db.lock().unwrap().insert(pkg, proc)?;
        Ok(())
    }

    /// Remove a hide entry; empty `proc` removes the whole package.
    pub fn remove(&self, pkg: &str, proc: &str) -> Result<(), EngineError> {
        {
            let mut guard = self.state.lock().unwrap();
            let state = self.init_state(&mut guard)?;
            let paths = self.platform_paths();

            let removed = if proc.is_empty() {
                if state.list.contains_package(pkg) {
                    state.uids.update_single(pkg, true, &paths);
                    state.list.remove_package(pkg);
                    info!(pkg, "hide list rm");
                    true
                } else {
                    false
                }
            } else {
                match state.list.remove_process(pkg, proc) {
                    RemoveOutcome::NotFound => false,
                    RemoveOutcome::Removed { package_emptied } => {
                        info!(pkg, proc, "hide list rm");
                        if package_emptied {
                            state.uids.update_single(pkg, true, &paths);
                        }
                        true
                    }
                }
            };
            if !removed {
                return Err(EngineError::ItemNotFound);
            }
        }

        let db = self.db.lock().unwrap();
        if proc.is_empty() {
            db.remove_package(pkg)?;
        } else {
            db.remove_process(pkg, proc)?;
        }
        Ok(())
    }

    /// Ordered snapshot of the list: package then process, both sorted.
    pub fn list(&self) -> Result<Vec<(String, String)>, EngineError> {
        let mut guard = self.state.lock().unwrap();
        let state = self.init_state(&mut guard)?;
        Ok(state.list.entries())
    }

    /// Membership probe with the fast lock-free reject when disabled.
    pub fn check(&self, uid: u32, process: &str) -> Result<bool, EngineError> {
        if !self.is_enabled() {
            return Ok(false);
        }
        self.is_hide_target(uid, process)
    }

    pub fn is_hide_target(&self, uid: u32, process: &str) -> Result<bool, EngineError> {
        self.is_hide_target_with(uid, process, self.cfg.max_prefix_len)
    }

    /// Resolve a live (uid, process name) pair to a hide decision.
    ///
    /// Command-line reads can be truncated, so a stored pattern also matches
    /// a shorter captured name that is its prefix, but only when both sides
    /// exceed `max_prefix_len` (truncation, not coincidence, explains the
    /// mismatch).
    pub fn is_hide_target_with(
        &self,
        uid: u32,
        process: &str,
        max_prefix_len: usize,
    ) -> Result<bool, EngineError> {
        let mut guard = self.state.lock().unwrap();
        let state = self.init_state(&mut guard)?;
        let paths = self.platform_paths();
        let HideState { list, uids } = state;
        uids.refresh(list, &paths);

        let app_id = to_app_id(uid);
        if app_id >= SANDBOX_APP_ID_THRESHOLD {
            if let Some(patterns) = list.processes(ISOLATED_PKG) {
                for p in patterns {
                    if pattern_matches(p, process, max_prefix_len) {
                        return Ok(true);
                    }
                }
            }
            if let Some(patterns) = uids.packages_for(ANY_SANDBOX_APP_ID) {
                for p in patterns {
                    if pattern_matches(p, process, max_prefix_len) {
                        return Ok(true);
                    }
                }
            }
            return Ok(false);
        }

        let Some(pkgs) = uids.packages_for(app_id) else {
            return Ok(false);
        };
        for pkg in pkgs {
            if list.contains(pkg, process) {
                return Ok(true);
            }
        }
        for pkg in pkgs {
            if pkg.len() > max_prefix_len
                && process.len() > max_prefix_len
                && pkg.starts_with(process)
            {
                return Ok(true);
            }
            if pkg == process {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Enable the engine: validate the environment, load the list, sweep
    /// pre-existing worker pools, start the monitor thread and persist the
    /// flag.
    pub fn launch(&self, late_props: bool) -> Result<(), EngineError> {
        if self.is_enabled() {
            return Ok(());
        }

        {
            let mut guard = self.state.lock().unwrap();

            if !self.cfg.proc_root.join("self/ns/mnt").exists() {
                warn!("kernel does not support mount namespaces");
                return Err(EngineError::NamespaceUnsupported);
            }
            self.reaper.ensure_open()?;

            info!("enabling hide engine");
            self.enabled.store(true, Ordering::Release);
            if let Err(e) = self.init_state(&mut guard) {
                self.enabled.store(false, Ordering::Release);
                return Err(e);
            }

            // Worker pools spawned before enabling must never retain
            // pre-hide state.
            if self.cfg.sdk_level >= 29 {
                self.reaper.kill_matching("usap32", MatchRule::Exact, true);
                self.reaper.kill_matching("usap64", MatchRule::Exact, true);
                self.reaper
                    .kill_matching("_zygote", MatchRule::SafeSuffix, true);
            }

            self.support.hide_sensitive_props();
            if late_props {
                self.support.hide_late_props();
            }

            let support = Arc::clone(&self.support);
            self.monitor.start(move || support.refresh_monitor())?;

            // Guard dropped here: the final index rebuild must run without
            // the lock held, or it can deadlock against the monitor thread.
        }

        self.refresh_index();

        if let Err(e) = self.db.lock().unwrap().set_flag(ENABLED_KEY, true) {
            warn!(error = %e, "failed to persist enabled flag");
        }
        Ok(())
    }

    /// Rebuild the uid index if the registry fingerprint changed. Takes the
    /// state lock itself; no-op while the engine state is absent.
    pub fn refresh_index(&self) {
        let mut guard = self.state.lock().unwrap();
        if let Some(state) = guard.as_mut() {
            let HideState { list, uids } = state;
            uids.refresh(list, &self.platform_paths());
        }
    }

    /// Disable the engine: free all in-memory state, signal the monitor
    /// thread to terminate and persist the flag.
    pub fn stop(&self) -> Result<(), EngineError> {
        {
            let mut guard = self.state.lock().unwrap();
            if self.is_enabled() {
                info!("disabling hide engine");
                *guard = None;
            }
            self.monitor.request_stop();
            self.enabled.store(false, Ordering::Release);
        }

        if let Err(e) = self.db.lock().unwrap().set_flag(ENABLED_KEY, false) {
            warn!(error = %e, "failed to persist enabled flag");
        }
        Ok(())
    }

    /// Daemon-startup replay: re-enable if the persisted flag says so; if
    /// already enabled, nudge the monitor thread and re-run the late
    /// property pass instead.
    pub fn auto_start(&self, late_props: bool) -> Result<(), EngineError> {
        if self.is_enabled() {
            self.monitor.request_refresh();
            self.support.hide_late_props();
            return Ok(());
        }
        let persisted = self.db.lock().unwrap().get_flag(ENABLED_KEY)?;
        if persisted {
            self.launch(late_props)
        } else {
            Ok(())
        }
    }
}

fn pattern_matches(pattern: &str, process: &str, max_prefix_len: usize) -> bool {
    if pattern.len() > max_prefix_len
        && process.len() > max_prefix_len
        && pattern.starts_with(process)
    {
        return true;
    }
    process.starts_with(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::fs::File;
    use std::os::unix::fs::MetadataExt;
    use std::sync::atomic::AtomicUsize;
    use tempfile::tempdir;

    struct RecordingReaper {
        kills: Mutex<Vec<(String, MatchRule, bool)>>,
    }

    impl RecordingReaper {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                kills: Mutex::new(Vec::new()),
            })
        }

        fn kills(&self) -> Vec<(String, MatchRule, bool)> {
            self.kills.lock().unwrap().clone()
        }
    }

    impl Reaper for Arc<RecordingReaper> {
        fn ensure_open(&self) -> std::io::Result<()> {
            Ok(())
        }

        fn kill_matching(&self, name: &str, rule: MatchRule, multi: bool) -> usize {
            self.kills
                .lock()
                .unwrap()
                .push((name.to_string(), rule, multi));
            0
        }
    }

    #[derive(Default)]
    struct RecordingSupport {
        props: AtomicUsize,
        late_props: AtomicUsize,
    }

    impl HideSupport for RecordingSupport {
        fn hide_sensitive_props(&self) {
            self.props.fetch_add(1, Ordering::SeqCst);
        }
        fn hide_late_props(&self) {
            self.late_props.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        engine: HideEngine,
        reaper: Arc<RecordingReaper>,
        support: Arc<RecordingSupport>,
        app_data: std::path::PathBuf,
    }

    /// Fake platform: registry file, one-user app-data tree, a proc root
    /// advertising mount-namespace support.
    fn fixture() -> Fixture {
        fixture_with_manager(None)
    }

    fn fixture_with_manager(manager: Option<&str>) -> Fixture {
        let dir = tempdir().unwrap();
        let registry = dir.path().join("packages.xml");
        File::create(&registry).unwrap();
        let app_data = dir.path().join("user_de");
        fs::create_dir_all(app_data.join("0")).unwrap();
        let proc_root = dir.path().join("proc");
        fs::create_dir_all(proc_root.join("self/ns")).unwrap();
        File::create(proc_root.join("self/ns/mnt")).unwrap();

        let cfg = EngineConfig {
            package_registry: registry,
            app_data_dir: app_data.clone(),
            proc_root,
            manager_package: manager.map(str::to_string),
            sdk_level: 30,
            max_prefix_len: 16,
        };
        let reaper = RecordingReaper::new();
        let support = Arc::new(RecordingSupport::default());
        let engine = HideEngine::new(
            cfg,
            HideStore::open_in_memory().unwrap(),
            Box::new(Arc::clone(&reaper)),
            support.clone(),
        );
        Fixture {
            _dir: dir,
            engine,
            reaper,
            support,
            app_data,
        }
    }

    fn install_pkg(fx: &Fixture, pkg: &str) -> u32 {
        let path = fx.app_data.join("0").join(pkg);
        fs::create_dir(&path).unwrap();
        fs::metadata(&path).unwrap().uid()
    }

    #[test]
    fn test_add_defaults_proc_and_kills_running_instance() {
        let fx = fixture();
        fx.engine.add("com.evil", "").unwrap();

        // The kill sweep ran before add returned, exact single-shot
        assert_eq!(
            fx.reaper.kills(),
            vec![("com.evil".to_string(), MatchRule::Exact, false)]
        );
        assert_eq!(
            fx.engine.list().unwrap(),
            vec![("com.evil".to_string(), "com.evil".to_string())]
        );
    }

    #[test]
    fn test_add_isolated_uses_prefix_multi_kill() {
        let fx = fixture();
        fx.engine.add(ISOLATED_PKG, "com.a:sandbox").unwrap();
        assert_eq!(
            fx.reaper.kills(),
            vec![("com.a:sandbox".to_string(), MatchRule::Prefix, true)]
        );
    }

    #[test]
    fn test_add_duplicate_reports_exists_without_rekill() {
        let fx = fixture();
        fx.engine.add("com.a", "com.a").unwrap();
        assert!(matches!(
            fx.engine.add("com.a", "com.a"),
            Err(EngineError::ItemExists)
        ));
        assert_eq!(fx.reaper.kills().len(), 1);
        assert_eq!(fx.engine.list().unwrap().len(), 1);
    }

    #[test]
    fn test_add_rejects_invalid_names() {
        let fx = fixture();
        assert!(matches!(
            fx.engine.add("com foo", ""),
            Err(EngineError::InvalidName)
        ));
        assert!(fx.engine.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove_missing_reports_not_found() {
        let fx = fixture();
        assert!(matches!(
            fx.engine.remove("com.ghost", ""),
            Err(EngineError::ItemNotFound)
        ));
    }

    #[test]
    fn test_remove_package_clears_uid_association() {
        let fx = fixture();
        let uid = install_pkg(&fx, "com.a");
        fx.engine.add("com.a", "").unwrap();
        assert!(fx.engine.is_hide_target(uid, "com.a").unwrap());

        fx.engine.remove("com.a", "").unwrap();
        assert!(!fx.engine.is_hide_target(uid, "com.a").unwrap());
        assert!(fx.engine.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove_last_process_drops_package() {
        let fx = fixture();
        fx.engine.add("com.a", "com.a").unwrap();
        fx.engine.add("com.a", "com.a:push").unwrap();

        fx.engine.remove("com.a", "com.a:push").unwrap();
        assert_eq!(fx.engine.list().unwrap().len(), 1);
        fx.engine.remove("com.a", "com.a").unwrap();
        assert!(fx.engine.list().unwrap().is_empty());
    }

    #[test]
    fn test_normal_regime_match() {
        let fx = fixture();
        let uid = install_pkg(&fx, "com.a");
        fx.engine.add("com.a", "").unwrap();

        assert!(fx.engine.is_hide_target(uid, "com.a").unwrap());
        assert!(!fx.engine.is_hide_target(uid, "com.a.other").unwrap());
        // Unrelated identity with no owned packages
        assert!(!fx.engine.is_hide_target(uid + 7, "com.a").unwrap());
    }

    #[test]
    fn test_normal_regime_matches_secondary_process() {
        let fx = fixture();
        let uid = install_pkg(&fx, "com.a");
        fx.engine.add("com.a", "com.a:remote").unwrap();

        assert!(fx.engine.is_hide_target(uid, "com.a:remote").unwrap());
        assert!(!fx.engine.is_hide_target(uid, "com.a:other").unwrap());
    }

    #[test]
    fn test_sandbox_regime_prefix_rule() {
        let fx = fixture();
        fx.engine
            .add(ISOLATED_PKG, "com.a:sandboxed_process")
            .unwrap();

        let uid = 90123;
        // Full name and longer instance names match as prefix extensions
        assert!(fx
            .engine
            .is_hide_target(uid, "com.a:sandboxed_process")
            .unwrap());
        assert!(fx
            .engine
            .is_hide_target(uid, "com.a:sandboxed_process:17")
            .unwrap());

        // Truncated read: both sides exceed the gate, pattern extends it
        assert!(fx
            .engine
            .is_hide_target_with(uid, "com.a:sandboxed_proces", 16)
            .unwrap());
        // With a higher gate the truncated form must match exactly
        assert!(!fx
            .engine
            .is_hide_target_with(uid, "com.a:sandboxed_proces", 30)
            .unwrap());

        assert!(!fx.engine.is_hide_target(uid, "com.b:worker").unwrap());
    }

    #[test]
    fn test_check_short_circuits_when_disabled() {
        let fx = fixture();
        let uid = install_pkg(&fx, "com.a");
        fx.engine.add("com.a", "").unwrap();

        assert!(!fx.engine.check(uid, "com.a").unwrap());
        fx.engine.launch(false).unwrap();
        assert!(fx.engine.check(uid, "com.a").unwrap());
    }

    #[test]
    fn test_launch_sweeps_worker_pools_and_persists() {
        let fx = fixture();
        fx.engine.launch(false).unwrap();

        assert!(fx.engine.is_enabled());
        let kills = fx.reaper.kills();
        assert!(kills.contains(&("usap32".to_string(), MatchRule::Exact, true)));
        assert!(kills.contains(&("usap64".to_string(), MatchRule::Exact, true)));
        assert!(kills.contains(&("_zygote".to_string(), MatchRule::SafeSuffix, true)));
        assert_eq!(fx.support.props.load(Ordering::SeqCst), 1);

        // Idempotent
        fx.engine.launch(false).unwrap();
        assert_eq!(fx.support.props.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_launch_fails_without_namespace_support() {
        let dir = tempdir().unwrap();
        let registry = dir.path().join("packages.xml");
        File::create(&registry).unwrap();
        let cfg = EngineConfig {
            package_registry: registry,
            app_data_dir: dir.path().join("user_de"),
            proc_root: dir.path().join("proc"), // no self/ns/mnt
            manager_package: None,
            sdk_level: 30,
            max_prefix_len: 16,
        };
        let engine = HideEngine::new(
            cfg,
            HideStore::open_in_memory().unwrap(),
            Box::new(RecordingReaper::new()),
            Arc::new(NoSupport),
        );

        assert!(matches!(
            engine.launch(false),
            Err(EngineError::NamespaceUnsupported)
        ));
        assert!(!engine.is_enabled());
    }

    #[test]
    fn test_stop_frees_state_and_clears_flag() {
        let fx = fixture();
        fx.engine.add("com.a", "").unwrap();
        fx.engine.launch(false).unwrap();

        fx.engine.stop().unwrap();
        assert!(!fx.engine.is_enabled());

        // Entries survive in the store and reload lazily
        assert_eq!(fx.engine.list().unwrap().len(), 1);
    }

    #[test]
    fn test_auto_start_replays_persisted_flag() {
        let fx = fixture();
        fx.engine.launch(false).unwrap();
        fx.engine.stop().unwrap();

        // Persisted flag is now false: auto_start keeps the engine off
        fx.engine.auto_start(false).unwrap();
        assert!(!fx.engine.is_enabled());

        fx.engine.launch(false).unwrap();
        assert!(fx.engine.is_enabled());
        // Already enabled: auto_start re-runs the late property pass
        let late_before = fx.support.late_props.load(Ordering::SeqCst);
        fx.engine.auto_start(true).unwrap();
        assert_eq!(fx.support.late_props.load(Ordering::SeqCst), late_before + 1);
    }

    #[test]
    fn test_init_replays_kill_sweep_from_store() {
        let dir = tempdir().unwrap();
        let registry = dir.path().join("packages.xml");
        File::create(&registry).unwrap();
        let store = HideStore::open_in_memory().unwrap();
        store.insert("com.a", "com.a").unwrap();
        store.insert(ISOLATED_PKG, "com.b:worker").unwrap();

        let reaper = RecordingReaper::new();
        let engine = HideEngine::new(
            EngineConfig {
                package_registry: registry,
                app_data_dir: dir.path().join("user_de"),
                proc_root: dir.path().join("proc"),
                manager_package: None,
                sdk_level: 30,
                max_prefix_len: 16,
            },
            store,
            Box::new(Arc::clone(&reaper)),
            Arc::new(NoSupport),
        );

        let entries = engine.list().unwrap();
        assert_eq!(entries.len(), 2);
        let kills = reaper.kills();
        assert!(kills.contains(&("com.a".to_string(), MatchRule::Exact, false)));
        assert!(kills.contains(&("com.b:worker".to_string(), MatchRule::Prefix, true)));
    }

    #[test]
    fn test_manager_app_id_follows_install_state() {
        let fx = fixture();
        assert_eq!(fx.engine.manager_app_id().unwrap(), None);

        let fx = fixture_with_manager(Some("com.manager.app"));
        let uid = install_pkg(&fx, "com.manager.app");
        assert_eq!(
            fx.engine.manager_app_id().unwrap(),
            Some(to_app_id(uid))
        );
    }

    #[test]
    fn test_pattern_matches_length_gate() {
        // Captured name is a truncation of the stored pattern
        assert!(pattern_matches(
            "com.a:sandboxed_process",
            "com.a:sandboxed_proces",
            16
        ));
        assert!(!pattern_matches(
            "com.a:sandboxed_process",
            "com.a:sandboxed_proces",
            30
        ));
        // Live name extends the stored pattern, no gate involved
        assert!(pattern_matches("com.a:sandbox", "com.a:sandbox:42", 30));
        assert!(!pattern_matches("com.a:sandbox", "com.b", 16));
    }
}
