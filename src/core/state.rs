//! # Application State
//!
//! Core business state for tether. This module contains domain logic
//! only - no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── backend_name: String          // which backend serves this run
//! ├── status_message: String        // status bar text
//! ├── connected: bool               // backend traffic seen
//! ├── sent_count: u32               // outbound messages recorded
//! ├── received_count: u32           // inbound batches recorded
//! ├── transcript: Transcript        // full wire traffic, in order
//! ├── error: Option<String>         // last rejected-batch reason
//! └── save_transcript: bool         // persist transcript on quit
//! ```
//!
//! State changes only happen through `update(state, action)` in
//! action.rs. This keeps things predictable, so no surprise mutations.

use crate::core::transcript::Transcript;
use crate::protocol::{Inbound, Outbound};

pub struct App {
    pub backend_name: String,
    pub status_message: String,
    pub connected: bool,
    pub sent_count: u32,
    pub received_count: u32,
    pub transcript: Transcript,
    pub error: Option<String>,
    pub save_transcript: bool,
}

impl App {
    pub fn new(backend_name: String, save_transcript: bool) -> Self {
        let transcript = Transcript::new(&backend_name);
        Self {
            backend_name,
            status_message: String::from("Waiting for backend..."),
            connected: false,
            sent_count: 0,
            received_count: 0,
            transcript,
            error: None,
            save_transcript,
        }
    }

    pub fn record_sent(&mut self, message: &Outbound) {
        self.transcript.record_sent(message);
        self.sent_count += 1;
    }

    pub fn record_received(&mut self, message: &Inbound) {
        self.transcript.record_received(message);
        self.received_count += 1;
    }
}
