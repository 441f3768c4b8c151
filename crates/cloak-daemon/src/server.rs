//! Unix domain socket listener and request dispatch for cloakd.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use cloak_engine::{to_app_id, EngineError, HideEngine};
use cloak_ipc::{CloakRequest, CloakResponse, HideEntry, Status, MAX_FRAME_SIZE};

#[derive(Debug, Clone, Copy)]
struct PeerCredentials {
    uid: u32,
}

impl PeerCredentials {
    #[cfg(target_os = "linux")]
    fn from_stream(stream: &UnixStream) -> Option<Self> {
        use std::os::unix::io::AsRawFd;
        let fd = stream.as_raw_fd();
        let mut cred: libc::ucred = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::ucred>() as libc::socklen_t;
        let ret = unsafe {
            libc::getsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_PEERCRED,
                &mut cred as *mut _ as *mut libc::c_void,
                &mut len,
            )
        };
        if ret == 0 {
            Some(Self { uid: cred.uid })
        } else {
            None
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn from_stream(_stream: &UnixStream) -> Option<Self> {
        None
    }
}

/// Run the listener loop until a shutdown signal arrives.
pub async fn run_listener(socket_path: PathBuf, engine: Arc<HideEngine>) -> Result<()> {
    let path = Path::new(&socket_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        tokio::fs::remove_file(path).await?;
    }

    let listener = UnixListener::bind(path)?;
    info!(socket = %socket_path.display(), "listening for connections");

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _addr)) => {
                        let engine = Arc::clone(&engine);
                        tokio::spawn(async move {
                            if let Err(e) = handle_client(stream, engine).await {
                                warn!(error = %e, "client handler error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "accept failed");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    if path.exists() {
        tokio::fs::remove_file(path).await?;
    }
    Ok(())
}

/// Handle a single client connection: u32-LE length prefix, bincode payload.
async fn handle_client(mut stream: UnixStream, engine: Arc<HideEngine>) -> Result<()> {
    let peer = PeerCredentials::from_stream(&stream);
    let daemon_uid = unsafe { libc::getuid() };

    loop {
        let mut len_buf = [0u8; 4];
        match stream.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("client disconnected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        let len = u32::from_le_bytes(len_buf) as usize;
        if len > MAX_FRAME_SIZE {
            warn!(len, "request frame too large, dropping client");
            return Ok(());
        }

        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).await?;

        let response = match bincode::deserialize::<CloakRequest>(&payload) {
            Ok(request) => {
                debug!(?request, "received request");
                dispatch(&engine, request, peer, daemon_uid)
            }
            Err(e) => {
                warn!(error = %e, "failed to deserialize request");
                CloakResponse::Ack(Status::Error)
            }
        };

        let resp_bytes = bincode::serialize(&response)?;
        let resp_len = (resp_bytes.len() as u32).to_le_bytes();
        stream.write_all(&resp_len).await?;
        stream.write_all(&resp_bytes).await?;
    }
}

/// List edits and lifecycle transitions require a privileged peer; the
/// membership probe is open to any local process. Root and the daemon's own
/// uid are always trusted; the configured manager app is trusted by app id.
fn is_privileged(engine: &HideEngine, peer: Option<PeerCredentials>, daemon_uid: u32) -> bool {
    let Some(creds) = peer else {
        return false;
    };
    if creds.uid == 0 || creds.uid == daemon_uid {
        return true;
    }
    engine.manager_app_id().ok().flatten() == Some(to_app_id(creds.uid))
}

fn dispatch(
    engine: &HideEngine,
    request: CloakRequest,
    peer: Option<PeerCredentials>,
    daemon_uid: u32,
) -> CloakResponse {
    match request {
        CloakRequest::Ping { client_version } => {
            info!(client_version = %client_version, "ping");
            CloakResponse::Pong {
                server_version: env!("CARGO_PKG_VERSION").to_string(),
            }
        }

        CloakRequest::Check { uid, process } => {
            // Hot path: short-circuits inside the engine when disabled
            let hidden = engine.check(uid, &process).unwrap_or_else(|e| {
                warn!(error = %e, "membership probe failed");
                false
            });
            CloakResponse::Check { hidden }
        }

        CloakRequest::List => match engine.list() {
            Ok(entries) => CloakResponse::List {
                status: Status::Success,
                entries: entries
                    .into_iter()
                    .map(|(pkg, proc)| HideEntry { pkg, proc })
                    .collect(),
            },
            Err(e) => {
                error!(error = %e, "list failed");
                CloakResponse::List {
                    status: Status::Error,
                    entries: Vec::new(),
                }
            }
        },

        CloakRequest::Add { .. }
        | CloakRequest::Remove { .. }
        | CloakRequest::Enable
        | CloakRequest::Disable
            if !is_privileged(engine, peer, daemon_uid) =>
        {
            warn!(?peer, "privileged request from unprivileged peer");
            CloakResponse::Ack(Status::Error)
        }

        CloakRequest::Add { pkg, proc } => CloakResponse::Ack(status_of(engine.add(&pkg, &proc))),
        CloakRequest::Remove { pkg, proc } => {
            CloakResponse::Ack(status_of(engine.remove(&pkg, &proc)))
        }
        CloakRequest::Enable => CloakResponse::Ack(status_of(engine.launch(false))),
        CloakRequest::Disable => CloakResponse::Ack(status_of(engine.stop())),
    }
}

fn status_of(result: Result<(), EngineError>) -> Status {
    match result {
        Ok(()) => Status::Success,
        Err(EngineError::InvalidName) => Status::InvalidName,
        Err(EngineError::ItemExists) => Status::ItemExists,
        Err(EngineError::ItemNotFound) => Status::ItemNotFound,
        Err(EngineError::NamespaceUnsupported) => Status::NoNamespace,
        Err(e) => {
            error!(error = %e, "request failed");
            Status::Error
        }
    }
}
