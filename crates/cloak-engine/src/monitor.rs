//! Control handle for the external monitor thread.
//!
//! The monitor itself lives outside this engine; the engine only signals
//! it. Signals replace the asynchronous thread signals of older designs
//! with an explicit channel: refresh requests are best-effort and stop
//! requests never block the caller.

use std::io;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorSignal {
    /// Re-read late-bound hiding state.
    Refresh,
    /// Terminate the monitor thread.
    Stop,
}

#[derive(Default)]
pub struct MonitorControl {
    tx: Mutex<Option<mpsc::Sender<MonitorSignal>>>,
}

impl MonitorControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the monitor thread if it is not already running. `on_refresh`
    /// runs on the monitor thread for every refresh signal.
    pub fn start<F>(&self, mut on_refresh: F) -> io::Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        let mut slot = self.tx.lock().unwrap();
        if slot.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("cloak-monitor".to_string())
            .spawn(move || {
                debug!("monitor thread started");
                while let Ok(signal) = rx.recv() {
                    match signal {
                        MonitorSignal::Stop => break,
                        MonitorSignal::Refresh => on_refresh(),
                    }
                }
                debug!("monitor thread exiting");
            })?;
        *slot = Some(tx);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.tx.lock().unwrap().is_some()
    }

    /// Best-effort refresh request; may race with in-progress monitor work.
    pub fn request_refresh(&self) {
        if let Some(tx) = self.tx.lock().unwrap().as_ref() {
            let _ = tx.send(MonitorSignal::Refresh);
        }
    }

    /// Ask the monitor thread to terminate. Does not wait for it.
    pub fn request_stop(&self) {
        if let Some(tx) = self.tx.lock().unwrap().take() {
            let _ = tx.send(MonitorSignal::Stop);
        }
    }
}
