//! # Transcript Persistence
//!
//! Save the wire traffic of a run to `~/.tether/transcripts/` so a
//! backend exchange can be inspected after the fact.
//!
//! Each transcript is a JSON file (`<uuid>.json`). All writes use
//! atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::protocol::{Inbound, Outbound};

/// One exchanged message with its direction and capture time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Sent {
        at: DateTime<Utc>,
        message: Outbound,
    },
    Received {
        at: DateTime<Utc>,
        message: Inbound,
    },
}

impl TranscriptEntry {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            TranscriptEntry::Sent { at, .. } => *at,
            TranscriptEntry::Received { at, .. } => *at,
        }
    }

    /// One-line form for the on-screen traffic log.
    pub fn describe(&self) -> String {
        match self {
            TranscriptEntry::Sent { message, .. } => message.describe(),
            TranscriptEntry::Received { message, .. } => {
                let Inbound::UpdateComponentStates { delta_states } = message;
                format!("update_component_states ({} component{})",
                    delta_states.len(),
                    if delta_states.len() == 1 { "" } else { "s" })
            }
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, TranscriptEntry::Sent { .. })
    }
}

/// Full record of one run's traffic, in arrival order.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Transcript {
    pub id: String,
    pub backend_name: String,
    pub started_at: DateTime<Utc>,
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new(backend_name: &str) -> Self {
        Transcript {
            id: new_transcript_id(),
            backend_name: backend_name.to_string(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn record_sent(&mut self, message: &Outbound) {
        self.entries.push(TranscriptEntry::Sent {
            at: Utc::now(),
            message: message.clone(),
        });
    }

    pub fn record_received(&mut self, message: &Inbound) {
        self.entries.push(TranscriptEntry::Received {
            at: Utc::now(),
            message: message.clone(),
        });
    }
}

/// Returns `~/.tether/transcripts/`, creating it if needed.
pub fn transcripts_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".tether").join("transcripts");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Generate a new UUID v4 transcript ID.
pub fn new_transcript_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Save a transcript into `dir`. Empty transcripts are skipped.
pub fn save_to_dir(dir: &Path, transcript: &Transcript) -> io::Result<()> {
    if transcript.entries.is_empty() {
        return Ok(());
    }
    let path = dir.join(format!("{}.json", transcript.id));
    atomic_write_json(&path, transcript)
}

/// Load a transcript from `dir` by ID.
pub fn load_from_dir(dir: &Path, id: &str) -> io::Result<Transcript> {
    let path = dir.join(format!("{}.json", id));
    let json = fs::read_to_string(&path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save the app's transcript under the default directory. This is the
/// single entry point for persistence — the TUI calls it on quit.
pub fn save_current(transcript: &Transcript) {
    let dir = match transcripts_dir() {
        Ok(d) => d,
        Err(e) => {
            warn!("Failed to locate transcripts directory: {}", e);
            return;
        }
    };
    if let Err(e) = save_to_dir(&dir, transcript) {
        warn!("Failed to save transcript: {}", e);
    } else {
        debug!("Transcript saved: {}", transcript.id);
    }
}
