//! Client protocol for the cloak daemon.
//!
//! Requests and responses are bincode-encoded enums framed with a u32-LE
//! length prefix over a Unix domain socket.

use serde::{Deserialize, Serialize};

/// Maximum accepted frame payload, to prevent DoS via huge allocations.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Outcome of a daemon request, shared by client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
    InvalidName,
    ItemExists,
    ItemNotFound,
    NoNamespace,
}

/// One hide-list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideEntry {
    pub pkg: String,
    pub proc: String,
}

impl std::fmt::Display for HideEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.pkg, self.proc)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CloakRequest {
    Ping {
        client_version: String,
    },
    /// Add a (package, process) pair to the hide list. Empty `proc` means
    /// "the package's main process".
    Add {
        pkg: String,
        proc: String,
    },
    /// Remove a pair; empty `proc` removes the whole package.
    Remove {
        pkg: String,
        proc: String,
    },
    List,
    /// Hot-path membership probe for a live process.
    Check {
        uid: u32,
        process: String,
    },
    Enable,
    Disable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CloakResponse {
    Pong { server_version: String },
    Ack(Status),
    List { status: Status, entries: Vec<HideEntry> },
    Check { hidden: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),
    #[error("unexpected response")]
    UnexpectedResponse,
}

/// Default daemon socket path.
pub fn default_socket_path() -> &'static str {
    "/run/cloak/cloakd.sock"
}

/// IPC client for communicating with cloakd.
pub mod client {
    use super::*;
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixStream;

    pub struct DaemonClient {
        stream: UnixStream,
    }

    impl DaemonClient {
        pub async fn connect() -> Result<Self, IpcError> {
            Self::connect_to(default_socket_path()).await
        }

        pub async fn connect_to(socket_path: impl AsRef<Path>) -> Result<Self, IpcError> {
            let stream = UnixStream::connect(socket_path.as_ref()).await?;
            Ok(Self { stream })
        }

        /// Send a request and receive its response.
        pub async fn send(&mut self, request: CloakRequest) -> Result<CloakResponse, IpcError> {
            let req_bytes = bincode::serialize(&request)?;
            if req_bytes.len() > MAX_FRAME_SIZE {
                return Err(IpcError::FrameTooLarge(req_bytes.len()));
            }
            let req_len = (req_bytes.len() as u32).to_le_bytes();

            self.stream.write_all(&req_len).await?;
            self.stream.write_all(&req_bytes).await?;

            let mut len_buf = [0u8; 4];
            self.stream.read_exact(&mut len_buf).await?;
            let resp_len = u32::from_le_bytes(len_buf) as usize;
            if resp_len > MAX_FRAME_SIZE {
                return Err(IpcError::FrameTooLarge(resp_len));
            }

            let mut resp_buf = vec![0u8; resp_len];
            self.stream.read_exact(&mut resp_buf).await?;

            Ok(bincode::deserialize(&resp_buf)?)
        }

        pub async fn ping(&mut self) -> Result<String, IpcError> {
            let request = CloakRequest::Ping {
                client_version: env!("CARGO_PKG_VERSION").to_string(),
            };
            match self.send(request).await? {
                CloakResponse::Pong { server_version } => Ok(server_version),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }

        pub async fn add(&mut self, pkg: &str, proc: &str) -> Result<Status, IpcError> {
            match self
                .send(CloakRequest::Add {
                    pkg: pkg.to_string(),
                    proc: proc.to_string(),
                })
                .await?
            {
                CloakResponse::Ack(status) => Ok(status),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }

        pub async fn remove(&mut self, pkg: &str, proc: &str) -> Result<Status, IpcError> {
            match self
                .send(CloakRequest::Remove {
                    pkg: pkg.to_string(),
                    proc: proc.to_string(),
                })
                .await?
            {
                CloakResponse::Ack(status) => Ok(status),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }

        pub async fn list(&mut self) -> Result<(Status, Vec<HideEntry>), IpcError> {
            match self.send(CloakRequest::List).await? {
                CloakResponse::List { status, entries } => Ok((status, entries)),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }

        pub async fn check(&mut self, uid: u32, process: &str) -> Result<bool, IpcError> {
            match self
                .send(CloakRequest::Check {
                    uid,
                    process: process.to_string(),
                })
                .await?
            {
                CloakResponse::Check { hidden } => Ok(hidden),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }

        pub async fn enable(&mut self) -> Result<Status, IpcError> {
            match self.send(CloakRequest::Enable).await? {
                CloakResponse::Ack(status) => Ok(status),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }

        pub async fn disable(&mut self) -> Result<Status, IpcError> {
            match self.send(CloakRequest::Disable).await? {
                CloakResponse::Ack(status) => Ok(status),
                _ => Err(IpcError::UnexpectedResponse),
            }
        }
    }
}
