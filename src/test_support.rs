//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::backend::{Backend, BackendError};
use crate::protocol::{Inbound, Outbound};

/// A backend that records every client message and never pushes
/// anything back. For tests of the channel plumbing.
#[derive(Default)]
pub struct RecordingBackend {
    received: Mutex<Vec<Outbound>>,
}

impl RecordingBackend {
    pub fn received(&self) -> Vec<Outbound> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn serve(
        &self,
        mut client: UnboundedReceiver<Outbound>,
        _push: UnboundedSender<Inbound>,
    ) -> Result<(), BackendError> {
        while let Some(message) = client.recv().await {
            self.received.lock().unwrap().push(message);
        }
        Ok(())
    }
}

/// Creates a test App wired to a nominal backend name.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new("test-backend".to_string(), false)
}
