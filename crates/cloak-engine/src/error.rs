use cloak_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid package or process name")]
    InvalidName,
    #[error("hide entry already exists")]
    ItemExists,
    #[error("hide entry does not exist")]
    ItemNotFound,
    #[error("kernel does not support mount namespaces")]
    NamespaceUnsupported,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
