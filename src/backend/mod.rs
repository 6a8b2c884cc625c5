//! # Backends
//!
//! The far side of the message channel. A backend owns the application
//! logic for the form: it receives the client's outbound traffic and
//! pushes component-state diffs back. The client never waits on it —
//! sends are fire-and-forget and diffs arrive whenever the backend
//! gets around to them.

pub mod local;

pub use local::LocalFormBackend;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::core::config::ResolvedConfig;
use crate::protocol::{Inbound, Outbound};

/// Errors that can occur while a backend serves a client.
#[derive(Debug)]
pub enum BackendError {
    /// Backend misconfigured. Not recoverable.
    Config(String),
    /// The push channel was closed (client dropped the receiver).
    ChannelClosed,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "backend config error: {msg}"),
            BackendError::ChannelClosed => write!(f, "push channel closed"),
        }
    }
}

impl std::error::Error for BackendError {}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Serves one client for the lifetime of the run.
    ///
    /// `client` carries the client's outbound messages; state diffs go
    /// back through `push`. Returning ends the session; a clean client
    /// hang-up (the `client` channel closing) is `Ok`.
    async fn serve(
        &self,
        client: UnboundedReceiver<Outbound>,
        push: UnboundedSender<Inbound>,
    ) -> Result<(), BackendError>;
}

/// Builds the backend named by the resolved config.
/// Unknown names fall back to the local backend with a warning.
pub fn build_backend(config: &ResolvedConfig) -> Arc<dyn Backend> {
    match config.backend.as_str() {
        "local" => Arc::new(LocalFormBackend::new(
            &config.label,
            config.max_message_len,
        )),
        other => {
            warn!("Unknown backend '{}', falling back to local", other);
            Arc::new(LocalFormBackend::new(
                &config.label,
                config.max_message_len,
            ))
        }
    }
}
