//! # Typed Diff Decoding
//!
//! Incoming batches carry one raw JSON record per component. Each
//! widget owns a typed diff struct; the form decodes the whole batch
//! before applying any of it, so a malformed batch rejects without
//! touching state.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::protocol::ComponentId;

/// Errors raised while decoding a state-diff batch.
/// These are a programming-error class (a misbehaving backend), not a
/// recoverable condition; callers log and drop the batch.
#[derive(Debug)]
pub enum DiffError {
    /// A component's diff failed to decode (wrong field types).
    Malformed {
        component: ComponentId,
        source: serde_json::Error,
    },
    /// The batch addressed a component the form does not have.
    UnknownComponent(ComponentId),
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffError::Malformed { component, source } => {
                write!(f, "malformed diff for component {component}: {source}")
            }
            DiffError::UnknownComponent(id) => {
                write!(f, "diff addressed unknown component {id}")
            }
        }
    }
}

impl std::error::Error for DiffError {}

/// Decodes one component's raw diff into its typed form.
pub fn decode<T: DeserializeOwned>(
    component: ComponentId,
    raw: serde_json::Value,
) -> Result<T, DiffError> {
    serde_json::from_value(raw).map_err(|source| DiffError::Malformed { component, source })
}
