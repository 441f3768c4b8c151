//! # cloak-daemon
//!
//! `cloakd` — the privileged daemon exposing the hide-list engine over a
//! Unix domain socket. Local clients edit the hidden-target list, query
//! state, or probe "is this running process a hide target?" during process
//! startup.

pub mod server;
pub mod support;
