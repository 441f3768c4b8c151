//! Hiding-support collaborators handed off to by the engine lifecycle.
//!
//! Property hiding and the monitor's own scanning are performed outside the
//! membership engine; this daemon wires logging stand-ins for them.

use cloak_engine::HideSupport;
use tracing::{debug, info};

pub struct PropertySupport;

impl HideSupport for PropertySupport {
    fn hide_sensitive_props(&self) {
        info!("hiding sensitive system properties");
    }

    fn hide_late_props(&self) {
        info!("hiding late-bound system properties");
    }

    fn refresh_monitor(&self) {
        debug!("monitor refresh requested");
    }
}
