//! Terminates already-running instances of freshly hidden targets.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Command-line comparison strategy, passed as data to a kill sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Exact,
    Prefix,
    /// Suffix match that never matches the webview zygote.
    SafeSuffix,
}

impl MatchRule {
    pub fn matches(self, cmdline: &str, name: &str) -> bool {
        match self {
            MatchRule::Exact => cmdline == name,
            MatchRule::Prefix => cmdline.starts_with(name),
            MatchRule::SafeSuffix => cmdline != "webview_zygote" && cmdline.ends_with(name),
        }
    }
}

/// Live-process sweeper. Abstracted so the engine can be exercised without
/// sending real signals.
pub trait Reaper: Send + Sync {
    /// Verify the process table is reachable.
    fn ensure_open(&self) -> io::Result<()>;

    /// Kill every live process whose command line matches `name` under
    /// `rule`; stops after the first kill unless `multi`. Returns the number
    /// of processes killed.
    fn kill_matching(&self, name: &str, rule: MatchRule, multi: bool) -> usize;
}

/// Reaper over a procfs-shaped directory tree: numeric per-process entries,
/// each with a NUL-separated `cmdline` file.
pub struct ProcfsReaper {
    proc_root: PathBuf,
}

impl ProcfsReaper {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// Enumerate live pids, invoking `f` for each until it returns false.
    pub fn crawl(&self, mut f: impl FnMut(i32) -> bool) {
        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Ok(pid) = name.parse::<i32>() else {
                continue;
            };
            if pid > 0 && !f(pid) {
                break;
            }
        }
    }

    /// First argument of a process's command line, if readable.
    pub fn read_cmdline(&self, pid: i32) -> Option<String> {
        let raw = fs::read(self.proc_root.join(pid.to_string()).join("cmdline")).ok()?;
        let first = raw.split(|&b| b == 0).next()?;
        Some(String::from_utf8_lossy(first).into_owned())
    }
}

impl Reaper for ProcfsReaper {
    fn ensure_open(&self) -> io::Result<()> {
        fs::read_dir(&self.proc_root).map(|_| ())
    }

    fn kill_matching(&self, name: &str, rule: MatchRule, multi: bool) -> usize {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let mut killed = 0;
        self.crawl(|pid| {
            let Some(cmdline) = self.read_cmdline(pid) else {
                return true;
            };
            if rule.matches(&cmdline, name) {
                debug!(pid, cmdline = %cmdline, "killing hidden target instance");
                let _ = kill(Pid::from_raw(pid), Signal::SIGKILL);
                killed += 1;
                return multi;
            }
            true
        });
        killed
    }
}
