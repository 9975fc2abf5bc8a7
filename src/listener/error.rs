use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("receive failed on {local}: {source}")]
    Receive {
        local: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid listener settings: {0}")]
    Config(#[from] crate::config::ConfigError),
}
